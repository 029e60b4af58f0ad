use clap::{Arg, ArgAction, Command};
use log::LevelFilter;
use phishguard::config::EngineConfig;
use phishguard::scanner::{ScanInput, Scanner};
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    let matches = Command::new("phishguard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Content-risk scoring engine for phishing and social-engineering detection")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Engine configuration file (tenant weights and bands)"),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Scan a message described in a YAML file"),
        )
        .arg(
            Arg::new("body")
                .long("body")
                .value_name("TEXT")
                .help("Message body text"),
        )
        .arg(
            Arg::new("subject")
                .long("subject")
                .value_name("TEXT")
                .help("Message subject"),
        )
        .arg(
            Arg::new("sender")
                .long("sender")
                .value_name("ADDRESS")
                .help("Sender email address"),
        )
        .arg(
            Arg::new("display-name")
                .long("display-name")
                .value_name("NAME")
                .help("Sender display name"),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .value_name("URL")
                .action(ArgAction::Append)
                .help("Embedded URL (repeatable)"),
        )
        .arg(
            Arg::new("tenant")
                .long("tenant")
                .value_name("ID")
                .help("Tenant identifier for weight/band lookup"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the full result as JSON"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new().filter_level(level).init();

    let config = match matches.get_one::<String>("config") {
        Some(path) => match EngineConfig::load_from_file(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config: {e:#}");
                process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let input = match build_input(&matches) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };

    let scanner = Scanner::new().with_config(config);
    let result = scanner.analyze(&input).await;

    if matches.get_flag("json") {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing result: {e}");
                process::exit(1);
            }
        }
        return;
    }

    println!(
        "{} {} — score {}/100 ({})",
        result.category.icon, result.category.label, result.score, result.band_label
    );
    println!();
    println!("{}", result.explanation.summary);
    if !result.explanation.findings.is_empty() {
        println!();
        println!("Findings:");
        for finding in &result.explanation.findings {
            println!("  - {finding}");
        }
    }
    println!();
    for tip in &result.explanation.tips {
        println!("Tip: {tip}");
    }
    println!();
    println!(
        "Components: text {} / links {} / sender {} ({} URL{} scanned, {} ms)",
        result.text.score,
        result.links.score,
        result.sender.score,
        result.url_count,
        if result.url_count == 1 { "" } else { "s" },
        result.duration_ms
    );
}

fn build_input(matches: &clap::ArgMatches) -> anyhow::Result<ScanInput> {
    if let Some(path) = matches.get_one::<String>("input") {
        let content = std::fs::read_to_string(path)?;
        let input: ScanInput = serde_yaml::from_str(&content)?;
        return Ok(input);
    }

    Ok(ScanInput {
        body: matches
            .get_one::<String>("body")
            .cloned()
            .unwrap_or_default(),
        subject: matches.get_one::<String>("subject").cloned(),
        sender_address: matches.get_one::<String>("sender").cloned(),
        sender_display_name: matches.get_one::<String>("display-name").cloned(),
        urls: matches
            .get_many::<String>("url")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        tenant_id: matches.get_one::<String>("tenant").cloned(),
    })
}
