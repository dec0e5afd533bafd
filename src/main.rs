use std::path::PathBuf;
use std::sync::Arc;

use clap::{Arg, ArgAction, Command};
use terminex::{
    Config, GoogleTranslateProvider, MachineTranslator, MockMode, MockTranslator, OverlapPolicy,
    TerminologyManager, TerminologyTranslator, ToolkitKind,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("terminex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate text while keeping glossary terms under control")
        .arg(
            Arg::new("text")
                .help("Source text to translate")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("target-locale")
                .help("Target language code (e.g., es, fr, de)")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("terms")
                .long("terms")
                .short('t')
                .help("Terminology CSV file or directory of CSV files"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("JSON configuration file"),
        )
        .arg(
            Arg::new("source-locale")
                .long("source")
                .short('s')
                .help("Source language code (default: language of the terminology)"),
        )
        .arg(
            Arg::new("toolkit")
                .long("toolkit")
                .help("Phrase extraction toolkit: linguistic or minimal"),
        )
        .arg(
            Arg::new("overlap")
                .long("overlap")
                .help("Overlapping span policy: longest or trust"),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use the pass-through mock translator instead of Google Translate")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("protect-only")
                .long("protect-only")
                .short('p')
                .help("Print the protected text and placeholder mapping without translating")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show detailed translation process")
                .action(ArgAction::SetTrue),
        )
}

fn load_config(matches: &clap::ArgMatches) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::from_json_file(&PathBuf::from(path))?,
        None => Config::default(),
    }
    .apply_env()?;

    if let Some(terms) = matches.get_one::<String>("terms") {
        config.terminology = Some(PathBuf::from(terms));
    }
    if let Some(toolkit) = matches.get_one::<String>("toolkit") {
        config.toolkit = toolkit.parse::<ToolkitKind>()?;
    }
    if let Some(overlap) = matches.get_one::<String>("overlap") {
        config.overlap_policy = overlap.parse::<OverlapPolicy>()?;
    }
    if let Some(source) = matches.get_one::<String>("source-locale") {
        config.source_locale = Some(source.clone());
    }
    Ok(config.validate()?)
}

async fn run<T: MachineTranslator>(
    translator: TerminologyTranslator<T>,
    text: &str,
    target_locale: &str,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = translator.translate(text, target_locale).await?;

    if verbose {
        println!("🔒 Protected: \"{}\"", outcome.protected_text);
        println!("📦 Terms protected: {}", outcome.terms);
        if !outcome.missing_placeholders.is_empty() {
            println!(
                "⚠️  Lost placeholders: {}",
                outcome.missing_placeholders.join(", ")
            );
        }
        println!();
    }
    println!("{}", outcome.text);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let matches = cli().get_matches();
    let text = matches
        .get_one::<String>("text")
        .ok_or("missing source text")?;
    let target_locale = matches
        .get_one::<String>("target-locale")
        .ok_or("missing target locale")?;
    let verbose = matches.get_flag("verbose");

    let config = load_config(&matches)?;
    if config.terminology.is_none() {
        warn!("No terminology configured; text will be translated without term protection");
    }

    let (manager, report) = TerminologyManager::from_config(&config);
    info!(
        "Loaded {} terms from {} sources ({} failed)",
        manager.store().len(),
        report.sources.len(),
        report.failures.len()
    );

    if verbose {
        println!("📝 Source: \"{}\"", text);
        println!(
            "🌍 {} → {}",
            config.source_locale.as_deref().unwrap_or(manager.language()),
            target_locale
        );
        println!(
            "🧰 Toolkit: {}, overlap: {}",
            config.toolkit, config.overlap_policy
        );
        println!();
    }

    if matches.get_flag("protect-only") {
        let protected = manager.preprocess(text);
        println!("{}", protected.text);
        let mut entries: Vec<_> = protected.mapping.iter().collect();
        entries.sort_by_key(|(_, term)| term.id);
        for (token, term) in entries {
            println!(
                "{}\t{}\t{}",
                token,
                protected.mapping.original(token).unwrap_or_default(),
                term.translation
            );
        }
        return Ok(());
    }

    let manager = Arc::new(manager);
    if matches.get_flag("mock") {
        let mut translator =
            TerminologyTranslator::new(manager, MockTranslator::new(MockMode::NoOp));
        if let Some(source) = &config.source_locale {
            translator = translator.with_source_locale(source);
        }
        run(translator, text, target_locale, verbose).await
    } else {
        let provider = match GoogleTranslateProvider::from_env() {
            Ok(provider) => provider,
            Err(e) => {
                eprintln!("❌ {}", e);
                eprintln!("   Set it with: export GOOGLE_TRANSLATE_API_KEY=your_api_key");
                eprintln!("   Or use --mock to use mock translator");
                return Err(e.into());
            }
        };
        let mut translator = TerminologyTranslator::new(manager, provider);
        if let Some(source) = &config.source_locale {
            translator = translator.with_source_locale(source);
        }
        run(translator, text, target_locale, verbose).await
    }
}
