use std::sync::Arc;

use shopit_core::state::{
    CartStore, ChatHistoryStore, FavoritesStore, PreferencesStore, Storage,
};
use shopit_core::{ChatSession, RetryPolicy, SessionBuilder as CoreBuilder};
use shopit_model::{ChatProvider, Transcript};

use crate::config::Config;
use crate::tools::*;

/// The default instructions of the grocery assistant.
pub const DEFAULT_SYSTEM_PROMPT: &str = include_str!("./system_prompt.md");

/// A session builder with the grocery tools installed.
///
/// See [`ChatSession`].
pub struct SessionBuilder {
    session_builder: CoreBuilder,
    youtube_api_key: Option<String>,
    firecrawl_api_key: Option<String>,
    retry_policy: RetryPolicy,
}

impl SessionBuilder {
    /// Creates a session builder with a specified chat provider.
    pub fn with_provider<P: ChatProvider + 'static>(provider: P) -> Self {
        let session_builder = CoreBuilder::with_provider(provider)
            .with_system_prompt(DEFAULT_SYSTEM_PROMPT);
        Self {
            session_builder,
            youtube_api_key: None,
            firecrawl_api_key: None,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Takes API keys and the retry policy from `config`.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.youtube_api_key = config.youtube_api_key.clone();
        self.firecrawl_api_key = config.firecrawl_api_key.clone();
        self.retry_policy = config.retry_policy.clone();
        self
    }

    /// Replaces the default system prompt.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.session_builder = self.session_builder.with_system_prompt(prompt);
        self
    }

    /// Resumes from a saved transcript.
    #[inline]
    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.session_builder = self.session_builder.with_transcript(transcript);
        self
    }

    /// Attaches a callback invoked with the transcript after every change.
    #[inline]
    pub fn on_update(
        mut self,
        on_update: impl Fn(&Transcript) + Send + Sync + 'static,
    ) -> Self {
        self.session_builder = self.session_builder.on_update(on_update);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> ChatSession {
        let Self {
            session_builder,
            youtube_api_key,
            firecrawl_api_key,
            retry_policy,
        } = self;
        session_builder
            .with_retry_policy(retry_policy.clone())
            .with_tool(RecipeIngredientsTool::new())
            .with_tool(ShoppingCartTool::new())
            .with_tool(
                VideoRecipeTool::new(youtube_api_key)
                    .with_retry_policy(retry_policy.clone()),
            )
            .with_tool(
                WebpageScraperTool::new(firecrawl_api_key)
                    .with_retry_policy(retry_policy),
            )
            .build()
    }
}

/// The client-side state of one user.
#[derive(Clone)]
pub struct UserState {
    /// The shopping cart.
    pub cart: CartStore,
    /// Favorite stores.
    pub favorites: FavoritesStore,
    /// Theme, language and profile.
    pub preferences: PreferencesStore,
    /// The saved chat transcript.
    pub history: ChatHistoryStore,
}

impl UserState {
    /// Opens the state of `user_id` in `storage`.
    pub fn open(storage: Arc<dyn Storage>, user_id: &str) -> Self {
        Self {
            cart: CartStore::new(Arc::clone(&storage)),
            favorites: FavoritesStore::new(Arc::clone(&storage), user_id),
            preferences: PreferencesStore::new(Arc::clone(&storage), user_id),
            history: ChatHistoryStore::new(storage, user_id),
        }
    }
}
