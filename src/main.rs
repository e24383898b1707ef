fn main() {
    unexpect::cli::run();
}
