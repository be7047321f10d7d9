use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    jobcorpus::apps::run_build_corpus(std::env::args().skip(1))
}
