mod cli;

use anyhow::Context;
use chapter_sync::error::{ChapterSyncError, Result};
use chapter_sync::types::MISC_INDEX;
use chapter_sync::{
    classify_catalog, BlockMerger, CatalogFetcher, FileReport, FileStatus, FragmentRenderer,
    SyncConfig, SyncProfile, TopicClassifier,
};
use clap::Parser;
use cli::{Cli, Commands, PreviewArgs, SyncArgs};
use tracing::{error, info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let profile = SyncProfile::builtin();

    let result = match &cli.command {
        None => handle_sync_command(&cli, &SyncArgs::default(), &profile).await,
        Some(Commands::Sync(args)) => handle_sync_command(&cli, args, &profile).await,
        Some(Commands::Preview(args)) => handle_preview_command(&cli, args, &profile).await,
        Some(Commands::Check) => handle_check_command(&cli, &profile).await,
    };

    if let Err(e) = result {
        error!("Operation failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn fetch_catalog(cli: &Cli) -> Result<String> {
    CatalogFetcher::validate_source(&cli.source)?;
    let fetcher = CatalogFetcher::new(cli.timeout)?;
    let (content, metadata) = fetcher.fetch(&cli.source).await?;
    info!("Fetched {} bytes from {}", metadata.total_bytes, metadata.source);
    Ok(content)
}

async fn handle_sync_command(cli: &Cli, args: &SyncArgs, profile: &SyncProfile) -> Result<()> {
    let config = SyncConfig {
        root: cli.root.clone(),
        dry_run: args.dry_run,
    };

    let content = fetch_catalog(cli).await?;
    let fragments = chapter_sync::build_fragments(&content, profile)?;
    let merger = BlockMerger::new(profile.markers.clone())?;

    let mut reports = Vec::new();
    for fragment in &fragments {
        let status = match merger.apply(&config.root, fragment, config.dry_run).await {
            Ok(outcome) => {
                let verb = if config.dry_run { "Would update" } else { "Updated" };
                info!(
                    "{} {}: {} new videos added",
                    verb,
                    fragment.filename,
                    outcome.added.len()
                );
                FileStatus::Updated {
                    added: outcome.added.len(),
                }
            }
            Err(e) if e.is_skippable() => {
                warn!("{}, skipping", e);
                FileStatus::Skipped {
                    reason: e.to_string(),
                }
            }
            Err(e) => return Err(e),
        };

        reports.push(FileReport {
            filename: fragment.filename.clone(),
            status,
        });
    }

    let added: usize = reports
        .iter()
        .map(|r| match r.status {
            FileStatus::Updated { added } => added,
            FileStatus::Skipped { .. } => 0,
        })
        .sum();
    let skipped = reports
        .iter()
        .filter(|r| matches!(r.status, FileStatus::Skipped { .. }))
        .count();

    info!(
        "Update complete: {} videos added across {} files, {} skipped",
        added,
        reports.len() - skipped,
        skipped
    );
    Ok(())
}

async fn handle_preview_command(
    cli: &Cli,
    args: &PreviewArgs,
    profile: &SyncProfile,
) -> Result<()> {
    let content = fetch_catalog(cli).await?;
    let (bucket, classifications) = classify_catalog(&content, profile)?;
    let classifier = TopicClassifier::new(profile);
    let renderer = FragmentRenderer::new(&profile.taxonomy);

    for classification in &classifications {
        println!(
            "\n=== {} -> {} ({}) ===",
            classification.subject, classification.filename, classification.subject_key
        );
        println!("Videos: {}", classification.video_count());
        println!("Misc: {}", classification.misc_count());

        for (paper, chapters) in &classification.papers {
            println!("{}", paper);
            for (index, videos) in chapters {
                let name = if *index == MISC_INDEX {
                    "Misc".to_string()
                } else {
                    profile
                        .taxonomy
                        .chapters(&classification.subject_key, paper)
                        .get(index - 1)
                        .cloned()
                        .unwrap_or_default()
                };
                println!("  {:>2} {}: {} videos", index, name, videos.len());
            }
        }

        if args.detailed {
            println!("\nTopics:");
            if let Some(topics) = bucket.get(&classification.subject) {
                for (topic, videos) in topics {
                    let slot = classifier
                        .locate(&classification.subject_key, topic)
                        .map(|(paper, index)| format!("{} #{}", paper, index))
                        .unwrap_or_else(|| "Misc".to_string());
                    println!("  {} ({} videos) -> {}", topic, videos.len(), slot);
                }
            }
            let lines = renderer.render_subject(classification);
            println!("Rendered lines: {}", lines.len());
        }
    }

    if let Some(json_path) = &args.json_output {
        let json_content = serde_json::to_string_pretty(&classifications)
            .context("Failed to serialize classification")?;

        tokio::fs::write(json_path, json_content)
            .await
            .context("Failed to write JSON preview file")?;

        info!("Classification written to: {}", json_path.display());
    }

    Ok(())
}

async fn handle_check_command(cli: &Cli, profile: &SyncProfile) -> Result<()> {
    let merger = BlockMerger::new(profile.markers.clone())?;
    let files = profile.target_files();
    let mut failed = 0;

    for filename in &files {
        match merger.inspect(&cli.root, filename).await {
            Ok(count) => info!("✓ {}: {} videos in marked region", filename, count),
            Err(e) if e.is_skippable() => {
                error!("✗ {}", e);
                failed += 1;
            }
            Err(e) => return Err(e),
        }
    }

    println!("\n=== Check Summary ===");
    println!("Ready: {}/{}", files.len() - failed, files.len());

    if failed > 0 {
        return Err(ChapterSyncError::Anyhow(anyhow::anyhow!(
            "{} subject files failed the check",
            failed
        )));
    }

    Ok(())
}
