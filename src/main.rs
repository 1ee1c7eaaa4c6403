use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;

use emoji_coverage::oracle::PangoOracle;
use emoji_coverage::{
    estimate, Corpus, Error, Estimate, Evaluation, Evaluator, MarkerTable, Progress,
    Qualification, QualificationFilter, Report, RunningTracker, RUNNING_TRACKER,
};

/// Checks which emoji of an `emoji-test.txt` corpus the local pango stack
/// renders as a single glyph.
#[derive(Parser, Clone, Debug, PartialEq)]
pub struct Opts {
    /// Path to emoji-test.txt
    #[clap(value_name = "CORPUS", env = "EMOJI_TEST_TXT", parse(from_os_str))]
    corpus: PathBuf,

    /// Version marker table (`major.minor ; hex ...` per line)
    #[clap(long, value_name = "PATH", env = "EMOJI_MARKERS", parse(from_os_str))]
    markers: Option<PathBuf>,

    /// Pango font description used for shaping
    #[clap(long, env = "EMOJI_FONT", default_value = "emoji 24")]
    font: String,

    #[clap(long)]
    include_minimally_qualified: bool,

    #[clap(long)]
    include_unqualified: bool,

    #[clap(long)]
    exclude_components: bool,

    /// Stop after this many records
    #[clap(long, value_name = "N")]
    stop_after: Option<u64>,

    /// List sequences that did not render
    #[clap(long)]
    failures: bool,

    /// Show every version marker, not only the estimate
    #[clap(long)]
    survey: bool,

    /// A level of verbosity, and can be used multiple times
    #[clap(short, long, parse(from_occurrences))]
    verbose: i32,
}

impl Opts {
    fn filter(&self) -> QualificationFilter {
        let mut filter = QualificationFilter::default();
        if self.include_minimally_qualified {
            filter = filter.include(Qualification::MinimallyQualified);
        }
        if self.include_unqualified {
            filter = filter.include(Qualification::Unqualified);
        }
        if self.exclude_components {
            filter = filter.exclude(Qualification::Component);
        }
        filter
    }
}

const PROGRESS_EVERY: u64 = 500;

struct RunResult {
    corpus: Corpus,
    estimate: Estimate,
    survey: Vec<(emoji_coverage::EmojiVersion, bool)>,
    evaluation: Evaluation,
}

fn main() {
    let opts: Opts = Opts::parse();
    let filter = match opts.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
    log::trace!("command line options: {:?}", opts);

    if let Err(err) = run(opts) {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(opts: Opts) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&opts.corpus)
        .map_err(Error::from)
        .with_context(|| format!("reading corpus {}", opts.corpus.display()))?;
    let corpus = Corpus::new(text)?.with_filter(opts.filter());

    let markers = match &opts.markers {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading markers {}", path.display()))?;
            MarkerTable::parse(&text)?
        }
        None => MarkerTable::builtin().clone(),
    };

    let (tx, rx) = chan::unbounded::<Progress>();
    let tracker: Arc<RunningTracker> = RUNNING_TRACKER.clone();
    let worker = {
        let tracker = tracker.clone();
        let font = opts.font.clone();
        let survey = opts.survey;
        let stop_after = opts.stop_after;
        let failures = opts.failures;
        std::thread::Builder::new()
            .name("emoji-evaluator".to_string())
            .spawn(move || -> anyhow::Result<RunResult> {
                // pango objects stay on this thread
                let mut oracle = PangoOracle::new(&font)
                    .ok_or_else(|| anyhow!("no pango font map available"))?;
                let survey = if survey {
                    markers.survey(&mut oracle)
                } else {
                    Vec::new()
                };
                let estimate = estimate(&markers, &mut oracle);
                let evaluation = Evaluator::new(&mut oracle, tx)
                    .with_tracker(&tracker)
                    .with_limit(stop_after)
                    .collect_failures(failures)
                    .run(corpus.records());
                Ok(RunResult {
                    corpus,
                    estimate,
                    survey,
                    evaluation,
                })
            })?
    };

    for progress in rx.iter() {
        let total = progress.state.num_total();
        if !progress.passed {
            log::debug!("cannot render {}", progress.record);
        }
        if total % PROGRESS_EVERY == 0 {
            log::info!("{}", progress.state);
        }
    }

    let outcome = worker
        .join()
        .map_err(|_| anyhow!("evaluation worker panicked"))??;

    print!(
        "{}",
        Report::new(
            &outcome.evaluation,
            outcome.estimate,
            outcome.corpus.version()
        )
    );

    if !outcome.survey.is_empty() {
        println!();
        for (version, renders) in &outcome.survey {
            println!("  {:<6} {}", version.to_string(), if *renders { "yes" } else { "no" });
        }
    }

    if opts.failures && !outcome.evaluation.failed().is_empty() {
        println!();
        for record in outcome.evaluation.failed() {
            println!("  {}\t{}", record.text(), record);
        }
    }

    Ok(())
}
