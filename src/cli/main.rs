use seqiahr::runner::run_with_args;

fn main() {
    if let Err(e) = run_with_args() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
