use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;

use markovgen_core::io::LineSource;
use markovgen_core::{FrequencyModel, Generator, Trainer};

#[derive(Parser, Debug)]
#[command(author, version, about = "Markov chain text generator", long_about = None)]
struct Cli {
	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, global = true, action = ArgAction::Count)]
	verbose: u8,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Train a model from a text corpus
	Train(TrainArgs),
	/// Generate a token sequence from a trained model
	Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct TrainArgs {
	/// Directory with *.txt UTF-8 documents (default: stdin)
	#[arg(long, value_name = "DIR")]
	input_dir: Option<PathBuf>,

	/// Output path for the trained model
	#[arg(short, long, value_name = "PATH")]
	model: PathBuf,

	/// Lowercase all input before tokenization
	#[arg(long)]
	lowercase: bool,

	/// Number of elements in the Markov chain
	#[arg(
		short = 'n',
		long = "chain-len",
		value_name = "N",
		default_value_t = 2,
		value_parser = parse_positive
	)]
	chain_len: usize,
}

#[derive(Args, Debug)]
struct GenerateArgs {
	/// Trained model to load
	#[arg(short, long, value_name = "PATH")]
	model: PathBuf,

	/// First token of the generated sequence
	#[arg(long, value_name = "TOKEN")]
	seed: Option<String>,

	/// Length of the generated sequence
	#[arg(short, long, value_name = "COUNT", value_parser = parse_positive)]
	length: usize,

	/// File to write the sequence to (default: stdout)
	#[arg(short, long, value_name = "PATH")]
	output: Option<PathBuf>,
}

/// Rejects zero and anything that is not an unsigned integer.
fn parse_positive(arg: &str) -> Result<usize, String> {
	match arg.parse::<usize>() {
		Ok(n) if n > 0 => Ok(n),
		_ => Err("must be a positive integer".to_owned()),
	}
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	let level = match cli.verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

	match cli.command {
		Commands::Train(args) => run_train(args),
		Commands::Generate(args) => run_generate(args),
	}
}

fn run_train(args: TrainArgs) -> Result<()> {
	let source = match &args.input_dir {
		Some(dir) => {
			if !dir.is_dir() {
				bail!("the dir {} does not exist", dir.display());
			}
			LineSource::from_dir(dir)
				.with_context(|| format!("cannot read corpus directory {}", dir.display()))?
		}
		None => LineSource::stdin(),
	};

	let mut trainer = Trainer::new(args.chain_len, args.lowercase)?;
	trainer.consume(source)?;
	let model = trainer.into_model();
	log::info!("trained model: {} context(s)", model.len());

	model
		.save(&args.model)
		.with_context(|| format!("cannot write model to {}", args.model.display()))?;
	Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<()> {
	if !args.model.is_file() {
		bail!("the file {} does not exist", args.model.display());
	}
	let model = FrequencyModel::load(&args.model)
		.with_context(|| format!("cannot load model from {}", args.model.display()))?;

	let generator = Generator::new(&model);
	let sequence = generator.generate(args.seed.as_deref(), args.length, &mut rand::rng())?;
	let text = sequence.join(" ");

	// The sequence is only written once generation fully succeeded
	match &args.output {
		Some(path) => std::fs::write(path, text)
			.with_context(|| format!("cannot write output to {}", path.display()))?,
		None => std::io::stdout().lock().write_all(text.as_bytes())?,
	}
	Ok(())
}
