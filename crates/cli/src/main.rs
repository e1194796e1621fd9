// adsmith CLI - generate ad copy for spreadsheet product rows
//
// The `generate` subcommand is the full read -> generate -> write job;
// the `range` and `col` subcommands expose the A1 algebra for scripting
// and debugging.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use adsmith_config::{gemini_api_key, sheets_access_token, Settings};
use adsmith_gemini::GeminiClient;
use adsmith_pipeline::{
    run_sheet_generation, GenerationJob, GenerationOptions, GenerationPipeline, JobError,
};
use adsmith_range::{column_index, column_letters, header_range, output_range};
use adsmith_sheets::GoogleSheetsClient;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE: u8 = 2;
pub const EXIT_SHEET_IO: u8 = 3;
pub const EXIT_MISSING_CREDENTIALS: u8 = 50;

#[derive(Parser)]
#[command(name = "adsmith")]
#[command(about = "Generate ad copy for spreadsheet product rows")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read product rows, generate one ad per row, write them back
    Generate {
        /// Spreadsheet document id
        #[arg(long)]
        spreadsheet_id: String,

        /// Data rows range, excluding headers (e.g. 'Sheet1!A2:D100')
        #[arg(long)]
        data_range: String,

        /// 1-based row number holding the column headers
        #[arg(long)]
        header_row: u32,

        /// Column letter the generated ads are written into
        #[arg(long)]
        output_column: String,

        /// Ad tone (default from settings, normally "Professional")
        #[arg(long)]
        tone: Option<String>,

        /// Maximum ad length in characters
        #[arg(long)]
        max_length: Option<u32>,

        /// Target platform (Facebook, Instagram, ...)
        #[arg(long)]
        platform: Option<String>,

        /// Model id override
        #[arg(long)]
        model: Option<String>,

        /// Gemini API key (falls back to GEMINI_API_KEY)
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Sheets OAuth access token (falls back to SHEETS_ACCESS_TOKEN)
        #[arg(long, env = "SHEETS_ACCESS_TOKEN", hide_env_values = true)]
        sheet_token: Option<String>,

        /// Only print ad text, no rationales
        #[arg(long)]
        quiet: bool,
    },

    /// Derive ranges from a data range without touching any sheet
    Range {
        #[command(subcommand)]
        command: RangeCommands,
    },

    /// Convert between column letters and 0-based indices
    Col {
        #[command(subcommand)]
        command: ColCommands,
    },
}

#[derive(Subcommand)]
enum RangeCommands {
    /// Print the header range for a data range
    Header {
        #[arg(long)]
        data_range: String,
        #[arg(long)]
        header_row: u32,
    },
    /// Print the output range for a data range and result count
    Output {
        #[arg(long)]
        data_range: String,
        #[arg(long)]
        column: String,
        #[arg(long)]
        rows: usize,
    },
}

#[derive(Subcommand)]
enum ColCommands {
    /// Column letters -> 0-based index
    ToIndex { letters: String },
    /// 0-based index -> column letters
    ToLetters { index: usize },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Generate {
            spreadsheet_id,
            data_range,
            header_row,
            output_column,
            tone,
            max_length,
            platform,
            model,
            api_key,
            sheet_token,
            quiet,
        } => cmd_generate(GenerateArgs {
            spreadsheet_id,
            data_range,
            header_row,
            output_column,
            tone,
            max_length,
            platform,
            model,
            api_key,
            sheet_token,
            quiet,
        }),
        Commands::Range { command } => cmd_range(command),
        Commands::Col { command } => cmd_col(command),
    };

    ExitCode::from(code)
}

struct GenerateArgs {
    spreadsheet_id: String,
    data_range: String,
    header_row: u32,
    output_column: String,
    tone: Option<String>,
    max_length: Option<u32>,
    platform: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    sheet_token: Option<String>,
    quiet: bool,
}

fn cmd_generate(args: GenerateArgs) -> u8 {
    let settings = Settings::load();

    let Some(api_key) = args.api_key.or_else(gemini_api_key) else {
        eprintln!("error: missing Gemini API key (set GEMINI_API_KEY or pass --api-key)");
        return EXIT_MISSING_CREDENTIALS;
    };
    let Some(token) = args.sheet_token.or_else(sheets_access_token) else {
        eprintln!("error: missing Sheets access token (set SHEETS_ACCESS_TOKEN or pass --sheet-token)");
        return EXIT_MISSING_CREDENTIALS;
    };

    let gemini = match &settings.gemini_api_base {
        Some(base) => GeminiClient::with_api_base(base, api_key),
        None => GeminiClient::new(api_key),
    }
    .with_model(args.model.unwrap_or_else(|| settings.model.clone()));

    let sheets = match &settings.sheets_api_base {
        Some(base) => GoogleSheetsClient::with_api_base(base, token),
        None => GoogleSheetsClient::new(token),
    };

    let mut pipeline = GenerationPipeline::new(gemini);
    if let Some(path) = &settings.prompt_template {
        pipeline = pipeline.with_template_file(path);
    }

    let job = GenerationJob {
        spreadsheet_id: args.spreadsheet_id,
        data_range: args.data_range,
        header_row: args.header_row,
        output_column: args.output_column,
        options: GenerationOptions {
            tone: args.tone.unwrap_or_else(|| settings.tone.clone()),
            max_length: args.max_length.unwrap_or(settings.max_length),
            platform: args.platform.unwrap_or_else(|| settings.platform.clone()),
        },
    };

    match run_sheet_generation(&sheets, &sheets, &pipeline, &job) {
        Ok(report) => {
            println!(
                "Wrote {} ads to {}",
                report.results.len(),
                report.output_range
            );
            if !args.quiet {
                for (i, copy) in report.results.iter().enumerate() {
                    println!("\nRow {}: {}", i + 1, copy.ad_text);
                    println!("  strategy: {}", copy.rationale);
                }
            }
            EXIT_SUCCESS
        }
        Err(JobError::Range(e)) => {
            eprintln!("error: {}", e);
            EXIT_USAGE
        }
        Err(e @ JobError::Sheet(_)) | Err(e @ JobError::EmptyRange(_)) => {
            eprintln!("error: {}", e);
            EXIT_SHEET_IO
        }
    }
}

fn cmd_range(command: RangeCommands) -> u8 {
    let result = match command {
        RangeCommands::Header {
            data_range,
            header_row,
        } => header_range(&data_range, header_row),
        RangeCommands::Output {
            data_range,
            column,
            rows,
        } => output_range(&data_range, &column, rows),
    };

    match result {
        Ok(range) => {
            println!("{}", range);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            EXIT_USAGE
        }
    }
}

fn cmd_col(command: ColCommands) -> u8 {
    match command {
        ColCommands::ToIndex { letters } => match column_index(&letters) {
            Ok(index) => {
                println!("{}", index);
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("error: {}", e);
                EXIT_USAGE
            }
        },
        ColCommands::ToLetters { index } => {
            println!("{}", column_letters(index));
            EXIT_SUCCESS
        }
    }
}
