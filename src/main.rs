use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Parser;
use eyre::{Result, bail};
use log::{info, warn};

mod cli;

use cli::{Cli, OutputFormat};

use subtrans::SubtitleSet;
use subtrans::config::Config;
use subtrans::store::{FileStorage, Ledger};
use subtrans::subtitles::{self, FetchOutcome};
use subtrans::{output, translate, youtube};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("subtrans.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("subtrans")
        .join("logs")
}

/// Accept a bare 11-character video ID or any of the supported URL shapes
fn resolve_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if regex::Regex::new(r"^[a-zA-Z0-9_-]{11}$").unwrap().is_match(input) {
        return Some(input.to_string());
    }
    subtrans::extract_video_id(input)
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let cli = Cli::parse();

    let config = Config::load().unwrap_or_default();
    let client = subtrans::build_client(config.request_timeout_secs)?;
    let ledger = Ledger::new(FileStorage::open_default());

    let target_lang = cli.lang.clone().or_else(|| config.default_lang.clone());

    // Collect URLs: from arg or stdin
    let urls = if let Some(ref url) = cli.url {
        vec![url.clone()]
    } else {
        let stdin = io::stdin();
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    };

    if urls.is_empty() {
        bail!("no URL or video ID provided\n\nUsage: subtrans <URL>\n       echo <URL> | subtrans");
    }

    for url_input in &urls {
        let url_input = url_input.trim();
        if url_input.is_empty() {
            continue;
        }

        let video_id = resolve_video_id(url_input).ok_or_else(|| {
            eyre::eyre!(
                "could not extract video ID from: {url_input}\n\nSupported formats:\n  https://www.youtube.com/watch?v=ID\n  https://youtu.be/ID\n  https://www.youtube.com/embed/ID\n  <11-character video ID>"
            )
        })?;

        if cli.simulate_payment {
            if ledger.simulate_payment(&video_id) {
                eprintln!("Recorded demo payment for {video_id} (paid: {})", ledger.is_video_paid(&video_id));
            } else {
                eprintln!("Failed to record demo payment for {video_id}");
            }
        }

        // Reuse a saved translation unless asked to refresh
        let saved = match &target_lang {
            Some(lang) if !cli.refresh => {
                ledger.translated_subtitles(&video_id, lang).map(|segments| SubtitleSet {
                    language: lang.clone(),
                    is_example: false,
                    segments,
                })
            }
            _ => None,
        };

        let set = match saved {
            Some(set) => {
                if cli.verbose {
                    eprintln!("Using saved translation for {video_id} ({})", set.language);
                }
                set
            }
            None => {
                let outcome = subtitles::fetch_subtitles(&client, &config.subtitle_api_url, &video_id).await;
                if let FetchOutcome::Fallback { reason, .. } = &outcome {
                    if cli.no_fallback {
                        bail!("subtitle fetch failed for {video_id} and --no-fallback set: {reason}");
                    }
                    if cli.verbose {
                        eprintln!("Subtitle fetch failed ({reason}), using example subtitles");
                    }
                }
                let set = outcome.into_set();

                match &target_lang {
                    Some(lang) => {
                        translate::translate_subtitles(&client, &config.translate_api_url, &set, lang, &cli.source_lang)
                            .await
                    }
                    None => set,
                }
            }
        };

        let video_info = if cli.info || cli.save {
            match youtube::get_video_info(&client, &config, &video_id).await {
                Ok(info) => info,
                Err(e) => {
                    warn!("Metadata lookup failed for {video_id}: {e}");
                    None
                }
            }
        } else {
            None
        };

        if cli.info {
            match &video_info {
                Some(info) => eprintln!("Title: {}\nChannel: {}", info.title, info.channel_title),
                None => eprintln!("No metadata found for {video_id}"),
            }
        }

        if cli.verbose {
            eprintln!(
                "Video: {video_id}\nLanguage: {}\nExample: {}\nSegments: {}",
                set.language,
                set.is_example,
                set.segments.len(),
            );
        }

        let rendered = match cli.format {
            OutputFormat::Text => output::render_text(&set),
            OutputFormat::Json => output::render_json(&set)?,
            OutputFormat::Srt => output::render_srt(&set),
        };

        if let Some(ref path) = cli.output {
            std::fs::write(path, &rendered)?;
            if cli.verbose {
                eprintln!("Output written to: {}", path.display());
            }
        } else {
            println!("{rendered}");
        }

        if cli.save {
            let language = target_lang.as_deref().unwrap_or(&set.language);
            let title = video_info.as_ref().map(|i| i.title.as_str()).unwrap_or("");
            if ledger.save_translated_video(&video_id, title, language, &set.segments) {
                if cli.verbose {
                    eprintln!("Saved {video_id} ({language})");
                }
            } else {
                eprintln!("Failed to save {video_id} ({language})");
            }
        }
    }

    Ok(())
}
