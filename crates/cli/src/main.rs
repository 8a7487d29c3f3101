use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{Catalog, DuplicateTitlePolicy};
use engine::{EngineConfig, FilmRecommendation, RecommendationEngine, RecommendationRequest};
use pipeline::DurationBucket;
use similarity::{SimilarityIndex, SimilarityMatrix, SimilarityOracle, TfIdfConfig};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// film-recs - content-based film recommender
#[derive(Parser)]
#[command(name = "film-recs")]
#[command(
    about = "Recommends films with similar descriptions, narrowed by category filters",
    long_about = None
)]
struct Cli {
    /// Path to the catalog CSV (Netflix titles export)
    #[arg(short, long, env = "FILM_RECS_CATALOG", default_value = "data/netflix_titles.csv")]
    catalog: PathBuf,

    /// Prebuilt similarity index artifact; built from the catalog when absent
    #[arg(short, long, env = "FILM_RECS_INDEX")]
    index: Option<PathBuf>,

    /// Engine config file (JSON)
    #[arg(long, env = "FILM_RECS_CONFIG")]
    config: Option<PathBuf>,

    /// Fail on duplicate titles instead of resolving to the first row
    #[arg(long)]
    strict_titles: bool,

    /// Precompute the full similarity matrix (small catalogs only)
    #[arg(long)]
    dense: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend films similar to a title
    Recommend {
        /// Seed film title (exact)
        #[arg(long)]
        title: String,

        /// Genre to keep (repeatable, any of them matches)
        #[arg(long = "genre")]
        genres: Vec<String>,

        /// Release year to keep (repeatable)
        #[arg(long = "year")]
        years: Vec<u16>,

        /// Age rating to keep (repeatable)
        #[arg(long = "rating")]
        ratings: Vec<String>,

        /// Duration bucket key or label (repeatable), see `filters`
        #[arg(long = "duration")]
        durations: Vec<String>,

        /// Number of recommendations to return
        #[arg(long)]
        limit: Option<usize>,

        /// Refuse to run without at least one genre
        #[arg(long)]
        require_genre: bool,
    },

    /// Answer a JSON request, printing a JSON response
    Request {
        /// Request file, `-` for stdin
        #[arg(long, default_value = "-")]
        file: PathBuf,
    },

    /// Search for films by title
    Search {
        /// Title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// List the available filter values
    Filters,

    /// Build the similarity index and save it as an artifact
    BuildIndex {
        /// Output path for the JSON artifact
        #[arg(long)]
        output: PathBuf,

        /// Drop common English words before weighting
        #[arg(long)]
        stop_words: bool,

        /// Ignore terms found in fewer descriptions than this
        #[arg(long)]
        min_df: Option<usize>,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if cli.strict_titles {
        config.duplicate_titles = DuplicateTitlePolicy::Reject;
    }

    let start = Instant::now();
    let catalog = Arc::new(
        Catalog::load_from_file(&cli.catalog, config.duplicate_titles)
            .with_context(|| format!("Failed to load catalog {}", cli.catalog.display()))?,
    );
    println!(
        "{} Loaded {} films in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::BuildIndex {
            output,
            stop_words,
            min_df,
        } => {
            let mut tfidf = config.tfidf.clone();
            tfidf.stop_words |= stop_words;
            if let Some(min_df) = min_df {
                tfidf.min_df = min_df;
            }
            handle_build_index(&catalog, tfidf, &output)?
        }
        Commands::Search { title } => handle_search(&catalog, &title),
        Commands::Filters => handle_filters(&catalog),
        Commands::Recommend {
            title,
            genres,
            years,
            ratings,
            durations,
            limit,
            require_genre,
        } => {
            config.require_genre |= require_genre;
            let engine = build_engine(catalog, cli.index.as_deref(), cli.dense, config)?;
            let mut request = RecommendationRequest::new(title)
                .with_genres(genres)
                .with_years(years)
                .with_age_ratings(ratings)
                .with_duration_buckets(durations);
            request.limit = limit;
            handle_recommend(&engine, &request)?
        }
        Commands::Request { file } => {
            let engine = build_engine(catalog, cli.index.as_deref(), cli.dense, config)?;
            handle_request(&engine, &file)?
        }
        Commands::Benchmark {
            requests,
            concurrent,
        } => {
            let engine = build_engine(catalog, cli.index.as_deref(), cli.dense, config)?;
            handle_benchmark(engine, requests, concurrent).await?
        }
    }

    Ok(())
}

/// Pair the catalog with a loaded or freshly built index.
///
/// An artifact built from other films (row count or titles) aborts here.
fn build_engine(
    catalog: Arc<Catalog>,
    index_path: Option<&Path>,
    dense: bool,
    config: EngineConfig,
) -> Result<RecommendationEngine> {
    let start = Instant::now();
    let index = match index_path {
        Some(path) => SimilarityIndex::load(path)
            .with_context(|| format!("Failed to load similarity index {}", path.display()))?,
        None => SimilarityIndex::from_catalog(&catalog, config.tfidf.clone()),
    };
    let oracle: Arc<dyn SimilarityOracle> = if dense {
        Arc::new(SimilarityMatrix::from_index(&index))
    } else {
        Arc::new(index)
    };
    info!("Similarity index ready in {:?}", start.elapsed());

    RecommendationEngine::with_config(catalog, oracle, config)
        .context("Similarity index does not match the catalog")
}

/// Handle the 'recommend' command
fn handle_recommend(engine: &RecommendationEngine, request: &RecommendationRequest) -> Result<()> {
    if !engine.catalog().contains_title(&request.seed_title) {
        println!(
            "{} '{}' is not in the catalog, try `search`",
            "✗".red(),
            request.seed_title
        );
        return Ok(());
    }

    let recommendations = engine.handle(request)?;
    if recommendations.is_empty() {
        println!(
            "{}",
            "No similar films match the selected categories.".yellow()
        );
        return Ok(());
    }
    print_recommendations(&request.seed_title, &recommendations);
    Ok(())
}

/// Handle the 'request' command
fn handle_request(engine: &RecommendationEngine, file: &Path) -> Result<()> {
    let mut text = String::new();
    if file == Path::new("-") {
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read request from stdin")?;
    } else {
        text = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read request {}", file.display()))?;
    }

    let request: RecommendationRequest =
        serde_json::from_str(&text).context("Malformed recommendation request")?;
    let recommendations = engine.handle(&request)?;
    println!("{}", serde_json::to_string_pretty(&recommendations)?);
    Ok(())
}

/// Handle the 'search' command
fn handle_search(catalog: &Catalog, title: &str) {
    let matches = catalog.search_titles(title);
    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (none)");
    }
    for film in matches.iter().take(20).filter_map(|&id| catalog.get_film(id)) {
        println!(
            "{}: {} ({}) [{}] {}",
            film.id,
            film.title,
            film.year.map(|y| y.to_string()).unwrap_or_else(|| "????".to_string()),
            film.genres.join(", "),
            film.rating.as_deref().unwrap_or("-")
        );
    }
}

/// Handle the 'filters' command
fn handle_filters(catalog: &Catalog) {
    println!("{}", "Genres:".bold().blue());
    for genre in catalog.genres() {
        println!("  {} {} ({})", "•".green(), genre, catalog.get_films_by_genre(genre).len());
    }

    let years: Vec<String> = catalog.years().iter().map(u16::to_string).collect();
    println!("{}", "Release years:".bold().blue());
    println!("  {}", years.join(" "));

    println!("{}", "Age ratings:".bold().blue());
    for rating in catalog.age_ratings() {
        println!("  {} {} ({})", "•".green(), rating, catalog.get_films_by_rating(rating).len());
    }

    println!("{}", "Duration buckets:".bold().blue());
    for bucket in DurationBucket::presets() {
        println!("  {} {:<9} {}", "•".green(), bucket.key, bucket.label);
    }
}

/// Handle the 'build-index' command
fn handle_build_index(catalog: &Catalog, tfidf: TfIdfConfig, output: &Path) -> Result<()> {
    let start = Instant::now();
    let index = SimilarityIndex::from_catalog(catalog, tfidf);
    index
        .save(output)
        .with_context(|| format!("Failed to write index {}", output.display()))?;
    println!(
        "{} Saved index for {} films (vocabulary {}) to {} in {:?}",
        "✓".green(),
        index.len(),
        index.model().vocabulary_size(),
        output.display(),
        start.elapsed()
    );
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    engine: RecommendationEngine,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let catalog_len = engine.catalog().len();
    if catalog_len == 0 || requests == 0 {
        bail!("Benchmark needs a non-empty catalog and at least one request");
    }

    // Random seeds across the catalog
    let seeds: Vec<usize> = (0..requests)
        .map(|_| rand::random::<u32>() as usize % catalog_len)
        .collect();

    let semaphore = Arc::new(tokio::sync::Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();
    let mut handles = Vec::with_capacity(requests);
    for seed in seeds {
        let engine = engine.clone();
        let permit = semaphore.clone().acquire_owned().await?;
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let start = Instant::now();
            let limit = engine.config().default_limit;
            let recs = engine.recommend_by_id(seed, &pipeline::FilterSet::new(), limit);
            (start.elapsed(), recs.len())
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for handle in handles {
        let (elapsed, _) = handle.await.context("Benchmark task panicked")?;
        timings.push(elapsed);
    }
    let total_time = wall_clock.elapsed();

    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let busy: Duration = timings.iter().sum();

    println!("Benchmark results:");
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", busy / timings.len() as u32);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.2} requests/second",
        requests as f64 / total_time.as_secs_f64()
    );

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(seed_title: &str, recommendations: &[FilmRecommendation]) {
    println!(
        "{}",
        format!("Films similar to '{}':", seed_title).bold().blue()
    );
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} ({}) - Similarity: {:.3}",
            (i + 1).to_string().green(),
            rec.title.bold(),
            rec.year.map(|y| y.to_string()).unwrap_or_else(|| "????".to_string()),
            rec.score
        );
        println!("   Genre: {}", rec.genres.join(", "));
        println!(
            "   Rating: {}  Duration: {}",
            rec.rating.as_deref().unwrap_or("-"),
            rec.duration.as_deref().unwrap_or("-")
        );
        println!("   {}", rec.description);
        if let Some(image) = &rec.image {
            println!("   Image: {}", image);
        }
    }
}
