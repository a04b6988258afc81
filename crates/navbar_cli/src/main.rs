//! CLI smoke entry point.
//!
//! Prints core linkage info, then the navbar frame for ROUTE as pretty JSON.
//! With `--session-db`, identity is resolved from that SQLite session store;
//! otherwise the viewer is a guest.

use clap::Parser;
use navbar_core::{
    load_config_from_path, MemorySessionStore, Navbar, NavbarConfig, SessionStore,
    SqliteSessionStore, ViewportScroll,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

#[derive(Debug, Parser)]
#[command(name = "navbar_cli", version, about = "Render the navbar frame for a route")]
struct Args {
    /// Router path to render (defaults to `/`).
    route: Option<String>,

    /// SQLite session database holding the team/admin slots.
    #[arg(long)]
    session_db: Option<PathBuf>,

    /// Navbar config JSON file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    println!("navbar_core ping={}", navbar_core::ping());
    println!("navbar_core version={}", navbar_core::core_version());

    match run(args) {
        Ok(frame) => {
            println!("{frame}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("navbar_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<String, String> {
    let config = match &args.config {
        Some(path) => load_config_from_path(path).map_err(|err| err.to_string())?,
        None => NavbarConfig::default(),
    };
    let store: Rc<dyn SessionStore> = match &args.session_db {
        Some(path) => Rc::new(SqliteSessionStore::open(path).map_err(|err| err.to_string())?),
        None => Rc::new(MemorySessionStore::new()),
    };

    let route = args.route.unwrap_or_else(|| "/".to_string());
    let mut navbar = Navbar::mount(config, store, Rc::new(ViewportScroll::new()), route);
    let view = navbar.view();
    navbar.unmount();

    serde_json::to_string_pretty(&view).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{run, Args};
    use clap::Parser;

    #[test]
    fn parses_route_and_flags() {
        let args =
            Args::try_parse_from(["navbar_cli", "/about", "--session-db", "/tmp/s.db"]).unwrap();
        assert_eq!(args.route.as_deref(), Some("/about"));
        assert_eq!(
            args.session_db.as_deref().and_then(|p| p.to_str()),
            Some("/tmp/s.db")
        );
        assert!(args.config.is_none());
    }

    #[test]
    fn rejects_unknown_flags_and_missing_values() {
        assert!(Args::try_parse_from(["navbar_cli", "--verbose"]).is_err());
        assert!(Args::try_parse_from(["navbar_cli", "--config"]).is_err());
        assert!(Args::try_parse_from(["navbar_cli", "/", "/about"]).is_err());
    }

    #[test]
    fn guest_frame_highlights_route() {
        let args = Args::try_parse_from(["navbar_cli", "/about"]).unwrap();
        let frame = run(args).unwrap();
        let json: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(json["identity"], "guest");
        assert_eq!(json["desktop_links"][1]["id"], "about");
        assert_eq!(json["desktop_links"][1]["active"], true);
        assert_eq!(json["desktop_links"][0]["active"], false);
    }

    #[test]
    fn frame_reads_identity_from_session_db() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.db");
        let store = navbar_core::SqliteSessionStore::open(&path).unwrap();
        store.put("team", r#"{"id":"t1"}"#).unwrap();
        drop(store);

        let path_arg = path.to_str().unwrap();
        let args = Args::try_parse_from(["navbar_cli", "/team", "--session-db", path_arg]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&run(args).unwrap()).unwrap();
        assert_eq!(json["identity"], "team");
    }
}
