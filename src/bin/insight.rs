//! Insight CLI - Command-line interface for Synheart Insight
//!
//! Commands:
//! - analyze: Compute the full analytics report for a record batch
//! - progress: Score a goal against its associated records
//! - narrate: Render the deterministic plain-language narrative
//! - validate: Validate records against health.record.v1
//! - schema: Print schema information

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use synheart_insight::pipeline::records_for_goal;
use synheart_insight::schema::{Goal, Record, RecordAdapter, SCHEMA_VERSION};
use synheart_insight::{fallback_narrative, InsightEngine, INSIGHT_VERSION, PRODUCER_NAME, REPORT_VERSION};

/// Insight - On-device analytics engine for personal health time-series
#[derive(Parser)]
#[command(name = "insight")]
#[command(author = "Synheart AI Inc")]
#[command(version = INSIGHT_VERSION)]
#[command(about = "Turn health records into trends, correlations, and progress", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full analytics report for a record batch
    Analyze {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Score a goal against its associated records
    Progress {
        /// Goal definition file (JSON)
        #[arg(short, long)]
        goal: PathBuf,

        /// Record input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Reference time (RFC 3339); defaults to now
        #[arg(long)]
        now: Option<String>,
    },

    /// Render the deterministic plain-language narrative
    Narrate {
        /// Record input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Goal definition file (JSON), included in the narrative
        #[arg(short, long)]
        goal: Option<PathBuf>,

        /// Reference time (RFC 3339); defaults to now
        #[arg(long)]
        now: Option<String>,

        /// Output the narrative as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Validate records against health.record.v1
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Print a machine-readable JSON Schema instead of text
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// JSON array of records
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (health.record.v1)
    Input,
    /// Output schema (insight.report.v1)
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), InsightCliError> {
    match cli.command {
        Commands::Analyze {
            input,
            output,
            input_format,
            output_format,
        } => cmd_analyze(&input, &output, input_format, output_format),

        Commands::Progress {
            goal,
            input,
            input_format,
            now,
        } => cmd_progress(&goal, &input, input_format, now.as_deref()),

        Commands::Narrate {
            input,
            input_format,
            goal,
            now,
            json,
        } => cmd_narrate(&input, input_format, goal.as_deref(), now.as_deref(), json),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),
    }
}

fn cmd_analyze(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
) -> Result<(), InsightCliError> {
    let records = read_records(input, &input_format)?;
    if records.is_empty() {
        return Err(InsightCliError::NoRecords);
    }
    reject_invalid(&records)?;

    let report = InsightEngine::new().analyze(&records);
    let output_data = match output_format {
        OutputFormat::Json => serde_json::to_string(&report)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&report)?,
    };

    if output.to_string_lossy() == "-" {
        println!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_progress(
    goal_path: &Path,
    input: &Path,
    input_format: InputFormat,
    now: Option<&str>,
) -> Result<(), InsightCliError> {
    let goal = read_goal(goal_path)?;
    let records = read_records(input, &input_format)?;
    reject_invalid(&records)?;

    let now = parse_now(now)?;
    let scoped = records_for_goal(&goal, &records);
    let progress = InsightEngine::new().goal_progress(&goal, &scoped, now);

    println!("{}", serde_json::to_string_pretty(&progress)?);
    Ok(())
}

fn cmd_narrate(
    input: &Path,
    input_format: InputFormat,
    goal_path: Option<&Path>,
    now: Option<&str>,
    json: bool,
) -> Result<(), InsightCliError> {
    let records = read_records(input, &input_format)?;
    reject_invalid(&records)?;

    let now = parse_now(now)?;
    let engine = InsightEngine::new();
    let report = engine.analyze_at(&records, now);

    let goal = goal_path.map(read_goal).transpose()?;
    let progress = goal.as_ref().map(|goal| {
        let scoped = records_for_goal(goal, &records);
        engine.goal_progress(goal, &scoped, now)
    });

    let narrative = fallback_narrative(&report, progress.as_ref(), goal.as_ref());

    if json {
        println!("{}", serde_json::to_string_pretty(&narrative)?);
    } else {
        for insight in &narrative.insights {
            println!("{}", insight);
        }
        if !narrative.recommendations.is_empty() {
            println!();
            for recommendation in &narrative.recommendations {
                println!("- {}", recommendation);
            }
        }
    }

    Ok(())
}

fn cmd_validate(
    input: &Path,
    input_format: InputFormat,
    json: bool,
) -> Result<(), InsightCliError> {
    let records = read_records(input, &input_format)?;
    let issues = RecordAdapter::validate_records(&records);

    let report = ValidationReport {
        total_records: records.len(),
        valid_records: records.len() - issues.len(),
        invalid_records: issues.len(),
        errors: issues
            .iter()
            .map(|issue| ValidationErrorDetail {
                index: issue.index,
                record_id: issue.record_id.clone(),
                error: issue.error.clone(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total records:   {}", report.total_records);
        println!("Valid records:   {}", report.valid_records);
        println!("Invalid records: {}", report.invalid_records);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Record {} (index {}): {}",
                    err.record_id.as_deref().unwrap_or("unknown"),
                    err.index,
                    err.error
                );
            }
        }
    }

    if report.invalid_records > 0 {
        Err(InsightCliError::ValidationFailed(report.invalid_records))
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), InsightCliError> {
    if json_schema {
        let document = match schema_type {
            SchemaType::Input => record_json_schema(),
            SchemaType::Output => report_json_schema(),
        };
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    match schema_type {
        SchemaType::Input => {
            println!("Input Schema: {}", SCHEMA_VERSION);
            println!();
            println!("Each record is one timestamped health observation:");
            println!();
            println!("- userId: owning user (required)");
            println!("- goalId: goal the observation counts toward (optional)");
            println!("- dataType: sleep, stress, nutrition, exercise, headache, weather,");
            println!("  blood_pressure, mood, hydration, medication, symptoms, vitals, custom");
            println!("- timestamp: RFC 3339, the time the observation pertains to");
            println!("- payload: a bare number, or an object carrying the numeric signal");
            println!("  under value/level/duration/quality/severity/systolic/diastolic,");
            println!("  or inside a <dataType>_data wrapper with those fields");
        }
        SchemaType::Output => {
            println!("Output Schema: {}", REPORT_VERSION);
            println!();
            println!("The report produced by '{} analyze' contains:", PRODUCER_NAME);
            println!();
            println!("- reportVersion: schema version ({})", REPORT_VERSION);
            println!("- producer: {{ name, version, instanceId }}");
            println!("- computedAtUtc: report timestamp");
            println!("- summary: per-type {{ count, average, latestValue }} plus");
            println!("  totalEntries, distinctTypeCount, dateRange");
            println!("- trends: per-type {{ direction, percentChange, firstPeriodAverage,");
            println!("  secondPeriodAverage }}");
            println!("- correlations: ranked {{ typeA, typeB, coefficient, strength,");
            println!("  direction, sampleSize }}");
        }
    }

    Ok(())
}

fn record_json_schema() -> serde_json::Value {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": SCHEMA_VERSION,
        "type": "object",
        "required": ["userId", "dataType", "timestamp", "payload"],
        "properties": {
            "schemaVersion": { "type": "string", "const": SCHEMA_VERSION },
            "recordId": { "type": "string" },
            "userId": { "type": "string", "minLength": 1 },
            "goalId": { "type": "string" },
            "dataType": {
                "type": "string",
                "enum": [
                    "sleep", "stress", "nutrition", "exercise", "headache",
                    "weather", "blood_pressure", "mood", "hydration",
                    "medication", "symptoms", "vitals", "custom"
                ]
            },
            "timestamp": { "type": "string", "format": "date-time" },
            "payload": { "type": ["number", "object"] }
        }
    })
}

fn report_json_schema() -> serde_json::Value {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": REPORT_VERSION,
        "type": "object",
        "required": ["reportVersion", "producer", "computedAtUtc", "summary", "trends", "correlations"],
        "properties": {
            "reportVersion": { "type": "string", "const": REPORT_VERSION },
            "producer": {
                "type": "object",
                "required": ["name", "version", "instanceId"],
                "properties": {
                    "name": { "type": "string", "const": PRODUCER_NAME },
                    "version": { "type": "string" },
                    "instanceId": { "type": "string" }
                }
            },
            "computedAtUtc": { "type": "string", "format": "date-time" },
            "summary": {
                "type": "object",
                "required": ["totalEntries", "distinctTypeCount", "types"],
                "properties": {
                    "totalEntries": { "type": "integer" },
                    "distinctTypeCount": { "type": "integer" },
                    "dateRange": {
                        "type": ["object", "null"],
                        "properties": {
                            "start": { "type": "string", "format": "date-time" },
                            "end": { "type": "string", "format": "date-time" }
                        }
                    },
                    "types": {
                        "type": "object",
                        "additionalProperties": {
                            "type": "object",
                            "required": ["count", "average"],
                            "properties": {
                                "count": { "type": "integer" },
                                "average": { "type": "number" },
                                "latestValue": {}
                            }
                        }
                    }
                }
            },
            "trends": {
                "type": "object",
                "additionalProperties": {
                    "type": "object",
                    "required": ["direction", "percentChange", "firstPeriodAverage", "secondPeriodAverage"],
                    "properties": {
                        "direction": {
                            "type": "string",
                            "enum": ["increasing", "decreasing", "stable", "no_data", "insufficient_data"]
                        },
                        "percentChange": { "type": "number" },
                        "firstPeriodAverage": { "type": "number" },
                        "secondPeriodAverage": { "type": "number" }
                    }
                }
            },
            "correlations": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["typeA", "typeB", "coefficient", "strength", "direction", "sampleSize"],
                    "properties": {
                        "typeA": { "type": "string" },
                        "typeB": { "type": "string" },
                        "coefficient": { "type": "number", "minimum": -1, "maximum": 1 },
                        "strength": { "type": "string", "enum": ["strong", "moderate"] },
                        "direction": { "type": "string", "enum": ["positive", "negative"] },
                        "sampleSize": { "type": "integer", "minimum": 4 }
                    }
                }
            }
        }
    })
}

// Helper functions

fn read_records(input: &Path, format: &InputFormat) -> Result<Vec<Record>, InsightCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(InsightCliError::NoInput);
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let records = match format {
        InputFormat::Ndjson => RecordAdapter::parse_ndjson(&input_data)?,
        InputFormat::Json => RecordAdapter::parse_array(&input_data)?,
    };
    Ok(records)
}

fn read_goal(path: &Path) -> Result<Goal, InsightCliError> {
    let data = fs::read_to_string(path)?;
    let goal: Goal = serde_json::from_str(&data)?;
    Ok(goal)
}

fn reject_invalid(records: &[Record]) -> Result<(), InsightCliError> {
    let issues = RecordAdapter::validate_records(records);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(InsightCliError::ValidationFailed(issues.len()))
    }
}

fn parse_now(now: Option<&str>) -> Result<DateTime<Utc>, InsightCliError> {
    match now {
        None => Ok(Utc::now()),
        Some(text) => DateTime::parse_from_rfc3339(text)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| InsightCliError::InvalidTime(format!("{}: {}", text, e))),
    }
}

// Error types

#[derive(Debug)]
enum InsightCliError {
    Io(io::Error),
    Engine(synheart_insight::AnalyticsError),
    Json(serde_json::Error),
    NoRecords,
    NoInput,
    ValidationFailed(usize),
    InvalidTime(String),
}

impl From<io::Error> for InsightCliError {
    fn from(e: io::Error) -> Self {
        InsightCliError::Io(e)
    }
}

impl From<synheart_insight::AnalyticsError> for InsightCliError {
    fn from(e: synheart_insight::AnalyticsError) -> Self {
        InsightCliError::Engine(e)
    }
}

impl From<serde_json::Error> for InsightCliError {
    fn from(e: serde_json::Error) -> Self {
        InsightCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<InsightCliError> for CliError {
    fn from(e: InsightCliError) -> Self {
        match e {
            InsightCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            InsightCliError::Engine(e) => CliError {
                code: "ENGINE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some(format!("Ensure input matches the {} schema", SCHEMA_VERSION)),
            },
            InsightCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            InsightCliError::NoRecords => CliError {
                code: "NO_RECORDS".to_string(),
                message: "No records found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            InsightCliError::NoInput => CliError {
                code: "NO_INPUT".to_string(),
                message: "stdin is a TTY".to_string(),
                hint: Some("Pipe records via stdin or pass --input <file>".to_string()),
            },
            InsightCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} records failed validation", count),
                hint: Some("Run 'insight validate' for details".to_string()),
            },
            InsightCliError::InvalidTime(msg) => CliError {
                code: "INVALID_TIME".to_string(),
                message: msg,
                hint: Some("Pass --now as RFC 3339, e.g. 2024-01-15T08:00:00Z".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_records: usize,
    valid_records: usize,
    invalid_records: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    record_id: Option<String>,
    error: String,
}
