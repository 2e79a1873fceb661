mod config;
mod handlers;

pub use config::{load, load_styles, ConfigFile, StylesFile};

use crate::error::Result;
use clap::{Arg, ArgAction, Command};
use std::time::Instant;

pub struct Cli {
    config: ConfigFile,
    start_time: Instant,
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}

impl Cli {
    pub fn new() -> Self {
        Self {
            config: ConfigFile::default(),
            start_time: Instant::now(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.start_time = Instant::now();
        let matches = self.build_cli().get_matches();

        self.setup_logging(matches.get_count("verbose"));

        if let Some(config_path) = matches.get_one::<String>("config") {
            self.config = config::load(config_path)?;
        }

        let result = match matches.subcommand() {
            Some(("render", sub_matches)) => handlers::handle_render_command(self, sub_matches),
            Some(("preview", sub_matches)) => handlers::handle_preview_command(self, sub_matches),
            Some(("check", sub_matches)) => handlers::handle_check_command(self, sub_matches),
            _ => {
                println!("No subcommand specified. Use --help for usage information.");
                Ok(())
            }
        };

        log::debug!("Finished in {:.2}ms", self.start_time.elapsed().as_secs_f64() * 1000.0);
        result
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    fn build_cli(&self) -> Command {
        let styles_arg = || {
            Arg::new("styles")
                .help("Styles file (.json or .toml) with a list of calls")
                .required(true)
                .index(1)
        };

        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .author("Kryon Development Team")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Engine configuration file path")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase verbosity (can be used multiple times)")
                    .action(ArgAction::Count),
            )
            .subcommand(
                Command::new("render")
                    .about("Compile every call and write the stylesheet")
                    .arg(styles_arg())
                    .arg(Arg::new("output").short('o').long("output").value_name("FILE").help("Output CSS file"))
                    .arg(Arg::new("names").long("names").help("Print the names returned for each call").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("preview")
                    .about("Print the CSS each call would produce, with the placeholder left in place")
                    .arg(styles_arg()),
            )
            .subcommand(
                Command::new("check")
                    .about("Report shortcut names that no plugin resolved")
                    .arg(styles_arg()),
            )
    }

    fn setup_logging(&self, verbose_count: u8) {
        let log_level = match verbose_count {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        // a logger may already be installed when run from tests
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log_level)
            .format_timestamp_secs()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::new().build_cli().debug_assert();
    }

    #[test]
    fn test_render_arguments() {
        let matches = Cli::new()
            .build_cli()
            .try_get_matches_from(["atomc", "-vv", "-c", "atomc.toml", "render", "styles.json", "-o", "out.css"])
            .unwrap();

        assert_eq!(matches.get_count("verbose"), 2);
        assert_eq!(matches.get_one::<String>("config").map(String::as_str), Some("atomc.toml"));
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "render");
        assert_eq!(sub.get_one::<String>("styles").map(String::as_str), Some("styles.json"));
        assert_eq!(sub.get_one::<String>("output").map(String::as_str), Some("out.css"));
    }

    #[test]
    fn test_styles_argument_is_required() {
        assert!(Cli::new().build_cli().try_get_matches_from(["atomc", "check"]).is_err());
    }
}
