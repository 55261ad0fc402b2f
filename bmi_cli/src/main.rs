use bmi_core::units::{self, LengthTarget, LengthUnit, MassTarget, MassUnit};
use bmi_core::*;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "bmi")]
#[command(about = "Body mass index, ideal weight and calorie calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate BMI, ideal weight and daily calories
    Calc {
        #[command(flatten)]
        input: CalcInput,

        /// Fill fields not given on the command line from the last session
        #[arg(long)]
        restore: bool,

        /// Save the result to history
        #[arg(long)]
        save: bool,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a length or weight between units
    Convert {
        #[command(subcommand)]
        kind: ConvertKind,
    },

    /// Show saved BMI results, newest first
    History {
        /// Print records as JSON
        #[arg(long)]
        json: bool,

        /// Delete all saved records
        #[arg(long)]
        clear: bool,
    },

    /// Forget the last-entered form values
    Reset,
}

/// Raw form fields; parsing and validation happen in bmi_core
#[derive(clap::Args)]
struct CalcInput {
    /// Height value (in --height-unit)
    #[arg(long, allow_hyphen_values = true)]
    height: Option<String>,

    /// Height unit: cm, m, mm, in, or ft (use --feet/--inches)
    #[arg(long)]
    height_unit: Option<String>,

    /// Feet part of height (implies --height-unit ft)
    #[arg(long, allow_hyphen_values = true)]
    feet: Option<String>,

    /// Inches part of height (implies --height-unit ft)
    #[arg(long, allow_hyphen_values = true)]
    inches: Option<String>,

    /// Weight value (in --weight-unit)
    #[arg(long, allow_hyphen_values = true)]
    weight: Option<String>,

    /// Weight unit: kg, g, lbs, oz, st
    #[arg(long)]
    weight_unit: Option<String>,

    /// Age in years (15-120)
    #[arg(long, allow_hyphen_values = true)]
    age: Option<String>,

    /// male or female
    #[arg(long)]
    gender: Option<String>,

    /// sedentary, lightly, moderately, very, extremely
    #[arg(long)]
    activity: Option<String>,
}

#[derive(Subcommand)]
enum ConvertKind {
    /// Convert a length (targets also include ft+in)
    Length {
        #[arg(allow_hyphen_values = true)]
        value: f64,
        from: String,
        to: String,
    },
    /// Convert a weight (targets also include st+lb)
    Weight {
        #[arg(allow_hyphen_values = true)]
        value: f64,
        from: String,
        to: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    bmi_core::logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Commands::Calc {
            input,
            restore,
            save,
            json,
        } => cmd_calc(data_dir, input, restore, save, json, &config),
        Commands::Convert { kind } => cmd_convert(kind),
        Commands::History { json, clear } => cmd_history(data_dir, json, clear),
        Commands::Reset => cmd_reset(data_dir),
    }
}

fn cmd_calc(
    data_dir: PathBuf,
    input: CalcInput,
    restore: bool,
    save: bool,
    json: bool,
    config: &Config,
) -> Result<()> {
    let mut calculator = Calculator::new(FileStore::new(data_dir));

    let mut form = form_from_args(input);
    if restore {
        match calculator.restore_form() {
            Some(saved) => {
                let saved = restorable(saved, &form);
                form = form.or(saved);
            }
            None => tracing::info!("No saved form to restore"),
        }
    }
    let form = form.or(defaults_from_config(config));

    let assessment = calculator.calculate(&form)?.clone();

    if json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        display_assessment(&assessment);
    }

    if save {
        let record = calculator.save_current()?;
        if !json {
            println!("\n✓ BMI record saved ({} on {})", record.bmi, record.iso_date);
        }
    }

    Ok(())
}

fn form_from_args(input: CalcInput) -> FormData {
    // Feet/inches only make sense with the ft unit
    let height_unit = input.height_unit.or_else(|| {
        (input.feet.is_some() || input.inches.is_some()).then(|| "ft".to_string())
    });

    FormData {
        measurements: RawMeasurements {
            height: input.height,
            height_unit,
            feet: input.feet,
            inches: input.inches,
            weight: input.weight,
            weight_unit: input.weight_unit,
        },
        age: input.age,
        gender: input.gender,
        activity_level: input.activity,
    }
}

/// A saved height unit must not reinterpret a newly entered height
fn restorable(mut saved: FormData, form: &FormData) -> FormData {
    let entered = &form.measurements;
    if entered.height.is_some() && entered.height_unit.is_none() {
        saved.measurements.height_unit = None;
        saved.measurements.feet = None;
        saved.measurements.inches = None;
    }
    saved
}

/// Preselected units and activity level; never measurement values
fn defaults_from_config(config: &Config) -> FormData {
    FormData {
        measurements: RawMeasurements {
            height_unit: Some(config.units.height_unit.clone()),
            weight_unit: Some(config.units.weight_unit.clone()),
            ..Default::default()
        },
        activity_level: Some(config.profile.activity_level.clone()),
        ..Default::default()
    }
}

fn cmd_convert(kind: ConvertKind) -> Result<()> {
    let converted = match kind {
        ConvertKind::Length { value, from, to } => {
            let from: LengthUnit = from.parse()?;
            let to: LengthTarget = to.parse()?;
            units::convert_length(value, from, to)?
        }
        ConvertKind::Weight { value, from, to } => {
            let from: MassUnit = from.parse()?;
            let to: MassTarget = to.parse()?;
            units::convert_weight(value, from, to)?
        }
    };

    println!("{}", converted);
    Ok(())
}

fn cmd_history(data_dir: PathBuf, json: bool, clear: bool) -> Result<()> {
    let mut history = HistoryStore::new(FileStore::new(data_dir));

    if clear {
        history.clear()?;
        println!("✓ BMI history cleared");
        return Ok(());
    }

    let records = history.load_all();

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No BMI history yet. Run `bmi calc --save` to record a result.");
        return Ok(());
    }

    println!("Recent BMI results (newest first):");
    for record in &records {
        println!("  {}  {:>5.1}  ({})", record.iso_date, record.bmi, record.category);
    }

    Ok(())
}

fn cmd_reset(data_dir: PathBuf) -> Result<()> {
    let mut calculator = Calculator::new(FileStore::new(data_dir));
    calculator.reset()?;
    println!("✓ Saved form values cleared");
    Ok(())
}

fn display_assessment(assessment: &Assessment) {
    let result = &assessment.result;
    let ideal = &assessment.ideal_weight;
    let calories = &assessment.calories;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  BMI {:.1}  {}", result.bmi, result.category);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  {}  {:.0}%",
        progress_bar(result.progress_width_percent),
        result.progress_width_percent
    );
    println!("  Band color: {}", result.color_tag.hex());
    println!("  {}", result.tips);
    println!();

    println!("  Ideal weight");
    println!(
        "    Healthy BMI range: {:.1} - {:.1} kg",
        ideal.bmi_range_kg[0], ideal.bmi_range_kg[1]
    );
    println!("    Robinson formula:  {:.1} kg", ideal.robinson);
    println!("    Devine formula:    {:.1} kg", ideal.devine);
    println!("    Miller formula:    {:.1} kg", ideal.miller);
    println!("    Hamwi formula:     {:.1} kg", ideal.hamwi);
    println!();

    println!("  Daily calories ({} activity)", assessment.activity);
    println!("    BMR (base):   {} cal/day", calories.bmr);
    println!("    Maintenance:  {} cal/day", calories.tdee);
    println!("    Weight loss:  {} cal/day", calories.weight_loss_target);
    println!("    Weight gain:  {} cal/day", calories.weight_gain_target);
    println!();
}

fn progress_bar(percent: f64) -> String {
    const WIDTH: usize = 20;
    let filled = ((percent / 100.0) * WIDTH as f64).round() as usize;
    let filled = filled.min(WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(WIDTH - filled))
}
