//! A terminal viewer for the artifacts of a grocery chat.
//!
//! It loads the saved chat history of the configured user, or a transcript
//! file given as the first argument, and lets you browse the artifacts and
//! manage the cart and favorite stores.

#[macro_use]
extern crate tracing;

use std::env;
use std::fs;
use std::io::Write as _;
use std::sync::Arc;

use owo_colors::OwoColorize;
use shopit::UserState;
use shopit::config::ConfigBuilder;
use shopit::core::artifact::{
    ArtifactsPanel, CartView, IngredientChecklist, Widget,
};
use shopit::core::state::StorageError;
use shopit::directory;
use shopit::present::{
    entries_text, ingredient_line, store_text, widget_text,
};
use shopit::storage::FileStorage;
use shopit_model::Transcript;
use tokio::io::{self, AsyncBufReadExt};

const BAR_CHAR: &str = "▎";

const HELP: &str = "\
commands:
  list              show the artifacts, newest first
  select <n>        show artifact <n> from the list
  toggle <n>        check or uncheck ingredient <n> of the shown recipe
  add               add the checked ingredients to the cart
  cart              show the cart
  remove <name>     remove an ingredient from the cart
  clear             empty the cart
  stores [term]     list the stores, or search them
  fav <id>          mark a store as favorite
  unfav <id>        unmark a favorite store
  favorites         list the favorite stores
  reload            load the conversation again
  quit              leave";

enum Command {
    List,
    Select(usize),
    Toggle(usize),
    Add,
    Cart,
    Remove(String),
    Clear,
    Stores(Option<String>),
    Fav(String),
    Unfav(String),
    Favorites,
    Reload,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim().to_owned())),
            None => (line, None),
        };
        let index = |arg: Option<String>| -> Result<usize, String> {
            arg.as_deref()
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .map(|n| n - 1)
                .ok_or_else(|| format!("`{name}` needs a number from the list"))
        };
        let text = |arg: Option<String>| -> Result<String, String> {
            arg.filter(|a| !a.is_empty())
                .ok_or_else(|| format!("`{name}` needs an argument"))
        };
        let command = match name {
            "list" | "ls" => Command::List,
            "select" => Command::Select(index(arg)?),
            "toggle" => Command::Toggle(index(arg)?),
            "add" => Command::Add,
            "cart" => Command::Cart,
            "remove" => Command::Remove(text(arg)?),
            "clear" => Command::Clear,
            "stores" => Command::Stores(arg.filter(|a| !a.is_empty())),
            "fav" => Command::Fav(text(arg)?),
            "unfav" => Command::Unfav(text(arg)?),
            "favorites" => Command::Favorites,
            "reload" => Command::Reload,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command `{other}`, try `help`")),
        };
        Ok(command)
    }
}

struct Viewer {
    state: UserState,
    transcript_path: Option<String>,
    panel: ArtifactsPanel,
    checklist: Option<(String, IngredientChecklist)>,
}

impl Viewer {
    fn reload(&mut self) -> Result<(), String> {
        let transcript = match &self.transcript_path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .map_err(|err| format!("cannot read {path}: {err}"))?;
                serde_json::from_str::<Transcript>(&raw)
                    .map_err(|err| format!("cannot parse {path}: {err}"))?
            }
            None => self
                .state
                .history
                .load()
                .map_err(storage_error)?
                .unwrap_or_default(),
        };
        info!("loaded {} messages", transcript.len());
        self.panel.update(&transcript);
        Ok(())
    }

    fn show_active(&mut self) -> Result<(), String> {
        if !self.panel.is_visible() {
            println!("No artifacts in this conversation.");
            return Ok(());
        }
        let cart = self.state.cart.items().map_err(storage_error)?;
        let Some(widget) = self.panel.active_widget(&cart) else {
            return Ok(());
        };
        let call_id = self
            .panel
            .active()
            .map(|artifact| artifact.call_id().to_owned())
            .unwrap_or_default();

        println!("{}{}", BAR_CHAR.bright_cyan(), self.panel.title().bold());
        match &widget {
            Widget::Ingredients(recipe) => {
                let stale = self
                    .checklist
                    .as_ref()
                    .is_none_or(|(id, _)| *id != call_id);
                if stale {
                    let checklist = IngredientChecklist::new(&recipe.ingredients);
                    self.checklist = Some((call_id, checklist));
                }
                self.print_checklist();
            }
            widget => {
                self.checklist = None;
                println!("{}", widget_text(widget));
            }
        }
        Ok(())
    }

    fn print_checklist(&self) {
        let Some((_, checklist)) = &self.checklist else {
            return;
        };
        if checklist.rows().is_empty() {
            println!("(no ingredients)");
        }
        for (i, (ingredient, checked)) in checklist.rows().iter().enumerate() {
            let mark = if *checked { "[x]" } else { "[ ]" };
            println!("{mark} {:>2}. {}", i + 1, ingredient_line(ingredient));
        }
        println!("{}", "`toggle <n>` to change, `add` to add to the cart".dimmed());
    }

    fn print_stores(
        &self,
        stores: &[&directory::GroceryStore],
    ) -> Result<(), String> {
        if stores.is_empty() {
            println!("No stores found.");
        }
        for store in stores {
            let favorite = self
                .state
                .favorites
                .contains(store.id)
                .map_err(storage_error)?;
            println!("{}", store_text(store, favorite));
        }
        Ok(())
    }

    /// Returns `false` when the viewer should exit.
    fn handle(&mut self, command: Command) -> Result<bool, String> {
        match command {
            Command::List => {
                if self.panel.is_visible() {
                    println!("{}", entries_text(&self.panel.entries()));
                } else {
                    println!("No artifacts in this conversation.");
                }
            }
            Command::Select(index) => {
                let entries = self.panel.entries();
                let entry = entries
                    .get(index)
                    .ok_or_else(|| format!("there is no artifact {}", index + 1))?;
                self.panel.select(&entry.call_id);
                self.show_active()?;
            }
            Command::Toggle(index) => {
                let Some((_, checklist)) = &mut self.checklist else {
                    return Err("no recipe is shown".to_owned());
                };
                if !checklist.toggle(index) {
                    return Err(format!("there is no ingredient {}", index + 1));
                }
                self.print_checklist();
            }
            Command::Add => {
                let Some((_, checklist)) = &self.checklist else {
                    return Err("no recipe is shown".to_owned());
                };
                let selected = checklist.selected();
                let count = selected.len();
                self.state.cart.add_items(selected).map_err(storage_error)?;
                println!("Added {count} ingredients to the cart.");
            }
            Command::Cart => {
                let items = self.state.cart.items().map_err(storage_error)?;
                let widget = Widget::ShoppingCart(CartView::from_items(&items));
                println!("{}", widget_text(&widget));
            }
            Command::Remove(name) => {
                if self.state.cart.remove_item(&name).map_err(storage_error)? {
                    println!("Removed {name} from the cart.");
                } else {
                    println!("{name} is not in the cart.");
                }
            }
            Command::Clear => {
                self.state.cart.clear().map_err(storage_error)?;
                println!("The cart is empty now.");
            }
            Command::Stores(term) => {
                let stores = match term {
                    Some(term) => directory::search(&term),
                    None => directory::stores().iter().collect(),
                };
                self.print_stores(&stores)?;
            }
            Command::Fav(id) => {
                let Some(store) = directory::find(&id) else {
                    return Err(format!("there is no store {id}"));
                };
                self.state.favorites.add(store.id).map_err(storage_error)?;
                println!("{} is a favorite now.", store.name);
            }
            Command::Unfav(id) => {
                if self.state.favorites.remove(&id).map_err(storage_error)? {
                    println!("Removed store {id} from the favorites.");
                } else {
                    println!("Store {id} is not a favorite.");
                }
            }
            Command::Favorites => {
                let stores = directory::favorite_stores(&self.state.favorites)
                    .map_err(storage_error)?;
                self.print_stores(&stores)?;
            }
            Command::Reload => {
                self.reload()?;
                self.show_active()?;
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match ConfigBuilder::from_env() {
        Ok(builder) => builder.build(),
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    debug!("config: {config:?}");

    let storage = match FileStorage::open(config.data_dir()) {
        Ok(storage) => storage,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let mut viewer = Viewer {
        state: UserState::open(Arc::new(storage), config.user_id()),
        transcript_path: env::args().nth(1),
        panel: ArtifactsPanel::new(),
        checklist: None,
    };
    let loaded = viewer.reload().and_then(|()| viewer.show_active());
    if let Err(err) = loaded {
        eprintln!("{}", err.bright_red());
    }
    println!("{}", "Type `help` for the commands.".dimmed());

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line().await else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let result = Command::parse(&line).and_then(|cmd| viewer.handle(cmd));
        match result {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => eprintln!("{}", err.bright_red()),
        }
    }
}

#[inline]
fn storage_error(err: StorageError) -> String {
    error!("storage failed: {err}");
    format!("storage failed: {err}")
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
