use clap::Parser;
use miette::{Report, Result};
use stepsat::{
    cli::{self, Args},
    command::{parse_script, Command, Session},
    Engine, Status,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<Status> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let script = cli::script_from_args(&args)?;
    let commands = parse_script(&script)?;

    let mut session = Session::new(Engine::new(args.heuristic));
    let initial = args.formula.map(Command::Formula);
    for command in initial.into_iter().chain(commands) {
        match session.execute(&command) {
            Ok(output) => println!("{output}"),
            Err(err) => eprintln!("{:?}", Report::new(err)),
        }
    }
    session.finish();

    let status = session.status();
    println!("result status: {status}");
    Ok(status)
}
