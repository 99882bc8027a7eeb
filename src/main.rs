//! Local Counter entry point
//!
//! Web: builds the counter page and wires its buttons.
//! Native: a small CLI over the same counter, persisted to a JSON file.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, MouseEvent};

    use local_counter::counter::{self, RESET_LABEL, SUBTITLE, TITLE};
    use local_counter::{Counter, KeyValueStore, LocalStorage, UnavailableStore};

    type PageCounter = Counter<Box<dyn KeyValueStore>>;

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Local Counter starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // No LocalStorage (sandboxed frame, storage disabled): count in memory only
        let store: Box<dyn KeyValueStore> = match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => Box::new(UnavailableStore::new(e.to_string())),
        };
        let counter = Rc::new(RefCell::new(Counter::open(store)));

        let mount = document
            .get_element_by_id("app")
            .or_else(|| document.body().map(Element::from))
            .expect("no mount point");

        let app = append(&document, &mount, "div", Some("App"));
        append(&document, &app, "h1", None).set_text_content(Some(TITLE));
        append(&document, &app, "h2", None).set_text_content(Some(SUBTITLE));

        let card = append(&document, &app, "div", Some("card"));
        let count_btn = append(&document, &card, "button", None);
        count_btn.set_text_content(Some(&counter.borrow().label()));

        let reset_btn = append(&document, &app, "button", None);
        reset_btn.set_text_content(Some(RESET_LABEL));

        // Re-render the label whenever the count changes
        {
            let count_btn = count_btn.clone();
            counter.borrow_mut().subscribe(move |c| {
                count_btn.set_text_content(Some(&counter::label(c)));
            });
        }

        setup_buttons(&count_btn, &reset_btn, counter);

        log::info!("Local Counter running!");
    }

    fn append(document: &Document, parent: &Element, tag: &str, class: Option<&str>) -> Element {
        let el = document.create_element(tag).expect("create_element failed");
        if let Some(class) = class {
            let _ = el.set_attribute("class", class);
        }
        let _ = parent.append_child(&el);
        el
    }

    fn setup_buttons(count_btn: &Element, reset_btn: &Element, counter: Rc<RefCell<PageCounter>>) {
        // Count button
        {
            let counter = counter.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                counter.borrow_mut().increment();
            });
            let _ = count_btn
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Reset button
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                counter.borrow_mut().reset();
                log::info!("Counter reset");
            });
            let _ = reset_btn
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use anyhow::Result;
    use clap::{Parser, Subcommand};

    use local_counter::consts::{DEFAULT_COUNT, DEFAULT_KEY};
    use local_counter::{Counter, FileStore, KeyValueStore, UnavailableStore};

    #[derive(Parser, Debug)]
    #[command(name = "local-counter", version, about = "A click counter that remembers its count")]
    pub struct Cli {
        /// Storage slot for the count
        #[arg(long, default_value = DEFAULT_KEY)]
        pub key: String,

        /// Count used when the slot is empty or unreadable
        #[arg(long, default_value_t = DEFAULT_COUNT, allow_negative_numbers = true)]
        pub default: i64,

        /// Store file (defaults to the platform data directory)
        #[arg(long)]
        pub store: Option<PathBuf>,

        #[command(subcommand)]
        pub command: Option<Command>,
    }

    #[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
    pub enum Command {
        /// Print the current count
        Show,
        /// Press the count button
        Increment {
            /// Number of presses
            #[arg(long, default_value_t = 1)]
            times: u32,
        },
        /// Press "Reset to 0"
        Reset,
        /// Set the count directly
        Set {
            #[arg(allow_negative_numbers = true)]
            value: i64,
        },
    }

    /// Store at `path`, or a memory-only stand-in if it cannot be opened
    fn open_store(path: Option<PathBuf>) -> Box<dyn KeyValueStore> {
        let Some(path) = path.or_else(FileStore::default_path) else {
            return Box::new(UnavailableStore::new("no platform data directory"));
        };
        match FileStore::open(&path) {
            Ok(store) => Box::new(store),
            Err(e) => Box::new(UnavailableStore::new(format!("{}: {}", path.display(), e))),
        }
    }

    /// Apply the command and return the resulting label
    pub fn run(cli: Cli) -> Result<String> {
        let store = open_store(cli.store);
        let mut counter = Counter::with_key(&cli.key, cli.default, store)?;

        match cli.command.unwrap_or(Command::Show) {
            Command::Show => {}
            Command::Increment { times } => counter.increment_by(times),
            Command::Reset => counter.reset(),
            Command::Set { value } => counter.set(value),
        }

        Ok(counter.label())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use tempfile::TempDir;

        fn parse(args: &[&str]) -> Cli {
            Cli::try_parse_from(std::iter::once("local-counter").chain(args.iter().copied()))
                .unwrap()
        }

        #[test]
        fn test_defaults() {
            let cli = parse(&[]);
            assert_eq!(cli.key, "myCounter");
            assert_eq!(cli.default, 0);
            assert_eq!(cli.store, None);
            assert_eq!(cli.command, None);
        }

        #[test]
        fn test_parse_commands() {
            assert_eq!(
                parse(&["increment", "--times", "3"]).command,
                Some(Command::Increment { times: 3 })
            );
            assert_eq!(parse(&["set", "-5"]).command, Some(Command::Set { value: -5 }));
            assert_eq!(parse(&["reset"]).command, Some(Command::Reset));
            assert!(Cli::try_parse_from(["local-counter", "--key", "k", "set"]).is_err());
        }

        #[test]
        fn test_count_persists_across_runs() {
            let tmp = TempDir::new().unwrap();
            let store = tmp.path().join("store.json");
            let store_arg = store.to_str().unwrap();

            assert_eq!(run(parse(&["--store", store_arg])).unwrap(), "count is 0");
            assert_eq!(
                run(parse(&["--store", store_arg, "increment", "--times", "3"])).unwrap(),
                "count is 3"
            );
            assert_eq!(run(parse(&["--store", store_arg, "show"])).unwrap(), "count is 3");
            assert_eq!(run(parse(&["--store", store_arg, "reset"])).unwrap(), "count is 0");

            let file = FileStore::open(&store).unwrap();
            assert_eq!(file.get(DEFAULT_KEY).unwrap().as_deref(), Some("0"));
        }

        #[test]
        fn test_malformed_store_still_counts() {
            let tmp = TempDir::new().unwrap();
            let store = tmp.path().join("store.json");
            std::fs::write(&store, "][").unwrap();
            let store_arg = store.to_str().unwrap();

            assert_eq!(
                run(parse(&["--store", store_arg, "--default", "4", "increment"])).unwrap(),
                "count is 5"
            );
            // Broken file is left alone
            assert_eq!(std::fs::read_to_string(&store).unwrap(), "][");
        }

        #[test]
        fn test_hand_edited_slot_keeps_saving() {
            let tmp = TempDir::new().unwrap();
            let store = tmp.path().join("store.json");
            std::fs::write(&store, r#"{"myCounter": 3, "note": true}"#).unwrap();
            let store_arg = store.to_str().unwrap();

            assert_eq!(run(parse(&["--store", store_arg, "increment"])).unwrap(), "count is 4");
            assert_eq!(run(parse(&["--store", store_arg, "show"])).unwrap(), "count is 4");

            let file = FileStore::open(&store).unwrap();
            assert_eq!(file.get("note").unwrap().as_deref(), Some("true"));
        }

        #[test]
        fn test_empty_key_is_an_error() {
            let tmp = TempDir::new().unwrap();
            let store = tmp.path().join("store.json");
            let cli = parse(&["--key", "", "--store", store.to_str().unwrap()]);
            assert!(run(cli).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    log::info!("Local Counter (native) starting...");

    let label = cli::run(cli::Cli::parse())?;
    println!("{}", label);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
