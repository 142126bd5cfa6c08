use std::process;

fn main() {
    let code = painel_cli::run();
    process::exit(code);
}
