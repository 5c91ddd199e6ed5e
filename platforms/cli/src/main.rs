use automata_engine::{
    AutomatonStep, Document, DocumentLoader, EngineError, Execution, MachineStep, Run,
    SampleRegistry, Status,
};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The machine document (.json) to execute
    #[clap(short, long, conflicts_with = "sample")]
    file: Option<PathBuf>,

    /// The name of a built-in sample machine
    #[clap(short, long)]
    sample: Option<String>,

    /// The input string; defaults to the document's own input
    #[clap(short, long)]
    input: Option<String>,

    /// Initial head position for Turing machines
    #[clap(long, allow_hyphen_values = true)]
    head: Option<i64>,

    /// Maximum number of transitions a Turing machine may apply
    #[clap(long)]
    max_steps: Option<usize>,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    trace: bool,

    /// List the built-in sample machines
    #[clap(short, long)]
    list: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.list {
        for name in SampleRegistry::list_names() {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    let document = match load(&cli) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut options = document.options;
    if let Some(head) = cli.head {
        options.head_position = head;
    }
    if let Some(max_steps) = cli.max_steps {
        options.max_steps = max_steps;
    }
    let input = cli.input.as_deref().unwrap_or(&document.input);

    info!("Running '{}' ({}) on {:?}", document.name, document.mode, input);
    let run = document.run_with(input, options);

    if cli.trace {
        match &run {
            Run::Automaton(automaton) => automaton.history().iter().for_each(print_automaton_step),
            Run::Turing(machine) => machine.history().iter().for_each(print_machine_step),
        }
        println!();
    }

    let status = run.outcome();
    println!("{status} after {} step(s)", run.len());

    if status == Status::Accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load(cli: &Cli) -> Result<Document, EngineError> {
    match (&cli.file, &cli.sample) {
        (Some(path), _) => DocumentLoader::load_document(path),
        (None, Some(name)) => SampleRegistry::get_by_name(name),
        (None, None) => Err(EngineError::ValidationError(
            "Either --file or --sample is required".to_string(),
        )),
    }
}

fn print_automaton_step(step: &AutomatonStep) {
    println!(
        "Step: {}, Status: {}, Input: [{}|{}], Message: {}",
        step.index, step.status, step.consumed, step.remaining, step.message
    );
}

fn print_machine_step(step: &MachineStep) {
    let (left, right) = step.tape.bounds();
    let head = step.tape.head();

    println!(
        "Step: {}, Status: {}, Tape: {}[{}]{}, Head: {}, Message: {}",
        step.index,
        step.status,
        step.tape.render(left..=head - 1),
        step.tape.read(),
        step.tape.render(head + 1..=right),
        head,
        step.message
    );
}
