use aoc_solvers::{solutions, Args, Parser};

fn main() {
    let args: Args = Args::parse();

    solutions().run(&args);
}
