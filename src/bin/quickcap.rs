use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use quickcap::config::Config;
use quickcap::context::{AppContext, StandardContext};
use quickcap::{CaptureParser, ExtractionContext, Locale};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Default)]
struct Args {
    locale: Option<Locale>,
    projects: Option<Vec<String>>,
    labels: Option<Vec<String>>,
    reference: Option<NaiveDateTime>,
    config_dir: Option<PathBuf>,
    json: bool,
    tokens: bool,
    words: Vec<String>,
}

fn main() -> Result<()> {
    init_logging();

    let raw: Vec<String> = env::args().skip(1).collect();
    if raw.is_empty() || raw.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }
    let args = parse_args(raw)?;

    let ctx_dirs = StandardContext::new(args.config_dir.clone());
    let config = Config::load_or_default(&ctx_dirs)?;
    log::debug!(
        "Using config at {}",
        ctx_dirs
            .get_config_file_path()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    );
    let registry = config.build_registry()?;
    let parser = CaptureParser::new(registry);

    let locale = args.locale.unwrap_or_else(|| config.effective_locale());
    let mut ctx = match args.reference {
        Some(reference) => ExtractionContext::new(locale, reference),
        None => ExtractionContext::now(locale),
    };
    ctx.projects = args.projects;
    ctx.labels = args.labels;

    let text = args.words.join(" ");

    if args.tokens {
        for token in parser.tokenize(&text, &ctx) {
            println!("{:<9} {:?}", token.kind.as_ref(), &text[token.start..token.end]);
        }
        return Ok(());
    }

    let result = parser.parse(&text, &ctx);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Title:    {}", result.cleaned_title);
    if let Some(due) = result.due_date {
        println!("Due:      {}", due.format("%Y-%m-%d %H:%M"));
    }
    if let Some(p) = result.priority {
        println!("Priority: {}", p);
    }
    if !result.labels.is_empty() {
        println!("Labels:   {}", result.labels.join(", "));
    }
    if let Some(project) = &result.project_ref {
        println!("Project:  {}", project);
    }
    Ok(())
}

fn init_logging() {
    let level = env::var("QUICKCAP_LOG")
        .ok()
        .and_then(|l| LevelFilter::from_str(&l).ok())
        .unwrap_or(LevelFilter::Warn);
    // Logging is optional; a second init (or no terminal) is not an error for the CLI.
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn parse_args(raw: Vec<String>) -> Result<Args> {
    let mut args = Args::default();
    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--locale" | "-l" => {
                let tag = iter.next().context("--locale needs a value")?;
                args.locale = Some(
                    Locale::from_tag(&tag).with_context(|| format!("Unsupported locale '{}'", tag))?,
                );
            }
            "--project" | "-p" => {
                let name = iter.next().context("--project needs a value")?;
                args.projects.get_or_insert_with(Vec::new).push(name);
            }
            "--label" => {
                let name = iter.next().context("--label needs a value")?;
                args.labels.get_or_insert_with(Vec::new).push(name);
            }
            "--reference" | "-r" => {
                let value = iter.next().context("--reference needs a value")?;
                args.reference = Some(parse_reference(&value)?);
            }
            "--config-dir" => {
                let dir = iter.next().context("--config-dir needs a value")?;
                args.config_dir = Some(PathBuf::from(dir));
            }
            "--json" => args.json = true,
            "--tokens" => args.tokens = true,
            "--" => {
                args.words.extend(iter.by_ref());
            }
            _ => args.words.push(arg),
        }
    }
    Ok(args)
}

fn parse_reference(value: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid reference '{}', expected YYYY-MM-DD[THH:MM]", value))?;
    Ok(date.and_time(chrono::NaiveTime::MIN))
}

fn print_help() {
    println!(
        "quickcap v{} - Parse a quick-capture line into task attributes",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    quickcap [OPTIONS] <text>...");
    println!();
    println!("OPTIONS:");
    println!("    -l, --locale <en|zh>          Capture language (default: config, then OS locale)");
    println!("    -p, --project <name>          Known project name (repeatable); restricts @project");
    println!("        --label <name>            Known label name (repeatable); restricts #label");
    println!("    -r, --reference <date>        Reference time, YYYY-MM-DD or YYYY-MM-DDTHH:MM");
    println!("        --config-dir <dir>        Directory holding capture.toml");
    println!("        --json                    Print the result as JSON");
    println!("        --tokens                  Print highlighted spans instead of the result");
    println!("    -h, --help                    Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("    quickcap Finish report #work tomorrow !1");
    println!("    quickcap --locale zh 明天开会 #项目A");
    println!();
    println!("Set QUICKCAP_LOG=debug to trace pipeline decisions.");
}
