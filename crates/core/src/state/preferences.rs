use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Storage, StorageError, load_or_default, store};

const DEFAULT_LANGUAGE: &str = "en";

/// The color theme of the interface.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Always light.
    Light,
    /// Always dark.
    Dark,
    /// Follow the operating system.
    #[default]
    System,
}

impl Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        };
        f.write_str(name)
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Contact details the user filled in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Home location, used for store suggestions.
    pub location: String,
}

/// A partial [`Profile`] change. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New contact email.
    pub email: Option<String>,
    /// New home location.
    pub location: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct Language(String);

impl Default for Language {
    fn default() -> Self {
        Self(DEFAULT_LANGUAGE.to_owned())
    }
}

/// Per-user theme, language and profile.
#[derive(Clone)]
pub struct PreferencesStore {
    storage: Arc<dyn Storage>,
    user_id: String,
}

impl PreferencesStore {
    /// Creates the preferences of `user_id`.
    pub fn new(storage: Arc<dyn Storage>, user_id: &str) -> Self {
        Self {
            storage,
            user_id: user_id.to_owned(),
        }
    }

    #[inline]
    fn key(&self, name: &str) -> String {
        format!("{name}-{}", self.user_id)
    }

    /// Returns the theme, [`Theme::System`] if never set.
    pub fn theme(&self) -> Result<Theme, StorageError> {
        load_or_default(self.storage.as_ref(), &self.key("theme"))
    }

    /// Sets the theme.
    pub fn set_theme(&self, theme: Theme) -> Result<(), StorageError> {
        store(self.storage.as_ref(), &self.key("theme"), &theme)
    }

    /// Returns the language code, `"en"` if never set.
    pub fn language(&self) -> Result<String, StorageError> {
        let Language(language) =
            load_or_default(self.storage.as_ref(), &self.key("language"))?;
        Ok(language)
    }

    /// Sets the language code.
    pub fn set_language(&self, language: &str) -> Result<(), StorageError> {
        store(self.storage.as_ref(), &self.key("language"), language)
    }

    /// Returns the profile, empty if never set.
    pub fn profile(&self) -> Result<Profile, StorageError> {
        load_or_default(self.storage.as_ref(), &self.key("userProfile"))
    }

    /// Applies `update` and returns the resulting profile.
    pub fn update_profile(
        &self,
        update: ProfileUpdate,
    ) -> Result<Profile, StorageError> {
        let mut profile = self.profile()?;
        if let Some(name) = update.name {
            profile.name = name;
        }
        if let Some(email) = update.email {
            profile.email = email;
        }
        if let Some(location) = update.location {
            profile.location = location;
        }
        store(self.storage.as_ref(), &self.key("userProfile"), &profile)?;
        Ok(profile)
    }
}
