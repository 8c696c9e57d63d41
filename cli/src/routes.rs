use indicatif::{ProgressBar, ProgressStyle};
use softcc::data::read_corpus;
use softcc::Runner;

use crate::opt;

pub fn summarize(cmd: opt::SummarizeArgs) -> i32 {
    let corpus = match read_corpus(&cmd.corpus) {
        Ok(corpus) => corpus,
        Err(err) => {
            eprintln!("Could not read corpus: {err}");
            return 1;
        }
    };

    let mean_len = corpus.n_tokens() as f64 / corpus.n_docs() as f64;
    println!("Documents   {}", corpus.n_docs());
    println!("Vocabulary  {}", corpus.n_words());
    println!("Tokens      {}", corpus.n_tokens());
    println!("Mean length {mean_len:.2}");
    0
}

fn progress_bar(n_iters: usize) -> ProgressBar {
    let progress_bar = ProgressBar::new(n_iters as u64);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "ll {msg} {wide_bar:.white/white} │{pos}/{len}, Elapsed \
        {elapsed_precise} ETA {eta_precise}│",
    ) {
        progress_bar.set_style(style.progress_chars("━╾ "));
    }
    progress_bar
}

pub fn run(cmd: opt::RunArgs) -> i32 {
    let config = match cmd.run_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Could not load run config: {err}");
            return 1;
        }
    };

    let corpus = match read_corpus(&cmd.corpus) {
        Ok(corpus) => corpus,
        Err(err) => {
            eprintln!("Could not read corpus: {err}");
            return 1;
        }
    };

    let n_iters = config.n_iters;
    let mut runner = match Runner::new(corpus, config) {
        Ok(runner) => runner,
        Err(err) => {
            eprintln!("Could not start sampler: {err}");
            return 1;
        }
    };

    let res = if cmd.quiet {
        runner.run(n_iters)
    } else {
        let pb = progress_bar(n_iters);
        let res = runner.run_with(n_iters, |report| {
            pb.set_position(report.iter as u64);
            pb.set_message(format!("{:.2}", report.loglike));
        });
        pb.finish_and_clear();
        res
    };

    match res {
        Ok(()) => {
            if !cmd.quiet {
                println!(
                    "Best log likelihood {:.6} at iteration {}",
                    runner.best_loglike(),
                    runner.best_iter()
                );
            }
            0
        }
        Err(err) => {
            eprintln!("Run failed: {err}");
            1
        }
    }
}
