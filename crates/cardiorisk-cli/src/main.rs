use std::env;
use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::PathBuf;

use cardiorisk_core::{body_mass_index, score, FeatureRecord, RiskLevel, ScoreResult};
use serde_json::Value;

mod api_client;
mod config;

use api_client::{ApiClient, RemotePrediction};
use config::Config;

const DEFAULT_REMOTE_MODEL: &str = "random_forest";

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() {
        print_help();
        return Ok(());
    }

    match args[0].as_str() {
        "score" => run_score(&args[1..]),
        "config" => run_config(&args[1..]),
        "health" => run_health(&args[1..]),
        "--help" | "-h" | "help" => {
            print_help();
            Ok(())
        }
        cmd => Err(format!("unknown command `{cmd}`")),
    }
}

fn run_score(args: &[String]) -> Result<(), String> {
    let options = parse_score_args(args)?;
    let config = Config::load()?.merge_with_env();

    let base = match &options.input {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
            Some(parse_feature_document(&raw)?)
        }
        None => None,
    };
    let features = build_features(base, &options.overrides);

    for warning in features.range_warnings() {
        eprintln!("warning: {warning}");
    }

    let format = match options.format {
        Some(format) => format,
        None => match config.output.format.as_deref() {
            Some(raw) => OutputFormat::parse(raw)?,
            None => OutputFormat::Table,
        },
    };

    let rendered = match &options.remote {
        None => {
            let result = score(&features);
            match format {
                OutputFormat::Table => render_local_table(&features, &result),
                OutputFormat::Json => render_local_json(&result)?,
            }
        }
        Some(remote) => {
            let client = match remote {
                RemoteTarget::Configured => ApiClient::new(&config.api)?,
                RemoteTarget::Url(url) => ApiClient::with_url(url)?,
            };
            let model = config.api.model.as_deref().unwrap_or(DEFAULT_REMOTE_MODEL);
            let prediction = client.predict(model, &features)?;
            match format {
                OutputFormat::Table => render_remote_table(&features, &prediction),
                OutputFormat::Json => render_remote_json(&prediction)?,
            }
        }
    };

    print!("{rendered}");
    Ok(())
}

fn run_config(args: &[String]) -> Result<(), String> {
    let action = args
        .first()
        .ok_or("config requires an action: get, set or path")?;

    match action.as_str() {
        "get" => {
            let key = args.get(1).ok_or("config get requires a key")?;
            let config = Config::load()?.merge_with_env();
            match config.get(key) {
                Some(value) => println!("{value}"),
                None => println!("(unset)"),
            }
            Ok(())
        }
        "set" => {
            let key = args.get(1).ok_or("config set requires a key")?;
            let value = args.get(2).ok_or("config set requires a value")?;
            let mut config = Config::load()?;
            config.set(key, value)?;
            config.save()?;
            println!("{key} = {value}");
            Ok(())
        }
        "path" => {
            println!("{}", Config::get_config_path()?.display());
            Ok(())
        }
        other => Err(format!("unknown config action `{other}`")),
    }
}

fn run_health(args: &[String]) -> Result<(), String> {
    let client = match args.first() {
        Some(url) => ApiClient::with_url(url)?,
        None => ApiClient::new(&Config::load()?.merge_with_env().api)?,
    };

    if client.health_check()? {
        println!("prediction API is healthy");
        Ok(())
    } else {
        Err("prediction API reported an unhealthy status".to_string())
    }
}

fn print_help() {
    println!("cardiorisk - cardiovascular disease risk scorer\n");
    println!("Usage:");
    println!("  cardiorisk score [--input FILE] [--age N] [--weight KG] [--height CM] [--bmi N] [--gender 1|2] [--cholesterol 0|1|2] [--gluc 0|1|2] [--ap-hi N] [--ap-lo N] [--smoke] [--alco] [--inactive] [--format table|json] [--remote [URL]]");
    println!("  cardiorisk config get|set KEY [VALUE]   (keys: api.url, api.model, output.format)");
    println!("  cardiorisk config path");
    println!("  cardiorisk health [URL]");
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err("format must be table or json".to_string()),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum RemoteTarget {
    Configured,
    Url(String),
}

/// Per-field values given on the command line.
#[derive(Debug, Default, PartialEq)]
struct FeatureOverrides {
    age_years: Option<f64>,
    weight: Option<f64>,
    height: Option<f64>,
    bmi: Option<f64>,
    gender: Option<f64>,
    cholesterol: Option<f64>,
    gluc: Option<f64>,
    ap_hi: Option<f64>,
    ap_lo: Option<f64>,
    smoke: Option<f64>,
    alco: Option<f64>,
    active: Option<f64>,
}

#[derive(Debug, Default)]
struct ScoreOptions {
    input: Option<PathBuf>,
    overrides: FeatureOverrides,
    format: Option<OutputFormat>,
    remote: Option<RemoteTarget>,
}

fn parse_score_args(args: &[String]) -> Result<ScoreOptions, String> {
    let mut options = ScoreOptions::default();
    let overrides = &mut options.overrides;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--input" => {
                i += 1;
                options.input = Some(PathBuf::from(
                    args.get(i).ok_or("--input requires a value")?,
                ));
            }
            "--format" => {
                i += 1;
                options.format = Some(OutputFormat::parse(
                    args.get(i).ok_or("--format requires a value")?,
                )?);
            }
            "--remote" => match args.get(i + 1) {
                Some(url) if !url.starts_with("--") => {
                    i += 1;
                    options.remote = Some(RemoteTarget::Url(url.clone()));
                }
                _ => options.remote = Some(RemoteTarget::Configured),
            },
            "--smoke" => overrides.smoke = Some(1.0),
            "--alco" => overrides.alco = Some(1.0),
            "--inactive" => overrides.active = Some(0.0),
            "--age" | "--weight" | "--height" | "--bmi" | "--gender" | "--cholesterol"
            | "--gluc" | "--ap-hi" | "--ap-lo" => {
                i += 1;
                let value = parse_number(
                    flag,
                    args.get(i).ok_or_else(|| format!("{flag} requires a value"))?,
                )?;
                let slot = match flag {
                    "--age" => &mut overrides.age_years,
                    "--weight" => &mut overrides.weight,
                    "--height" => &mut overrides.height,
                    "--bmi" => &mut overrides.bmi,
                    "--gender" => &mut overrides.gender,
                    "--cholesterol" => &mut overrides.cholesterol,
                    "--gluc" => &mut overrides.gluc,
                    "--ap-hi" => &mut overrides.ap_hi,
                    _ => &mut overrides.ap_lo,
                };
                *slot = Some(value);
            }
            other => return Err(format!("unknown score option `{other}`")),
        }
        i += 1;
    }

    Ok(options)
}

fn parse_number(flag: &str, raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| format!("{flag} expects a number, got `{raw}`"))
}

/// Accepts a full request body (`{"features": {...}}`) or a bare feature object.
fn parse_feature_document(raw: &str) -> Result<FeatureRecord, String> {
    let document: Value =
        serde_json::from_str(raw).map_err(|err| format!("input is not valid JSON: {err}"))?;
    let features = match document.get("features") {
        Some(Value::Null) => return Err("input has an empty `features` field".to_string()),
        Some(features) => features.clone(),
        None => document,
    };
    serde_json::from_value(features).map_err(|err| format!("invalid feature record: {err}"))
}

/// Values the dashboard form starts from.
fn form_defaults() -> FeatureRecord {
    let (weight, height) = (70.0, 170.0);
    FeatureRecord {
        age_years: 45.0,
        weight,
        height,
        bmi: body_mass_index(weight, height),
        gender: 1.0,
        cholesterol: 1.0,
        gluc: 1.0,
        ap_hi: 120.0,
        ap_lo: 80.0,
        smoke: 0.0,
        alco: 0.0,
        active: 1.0,
    }
}

/// Applies overrides on top of a file record or the form defaults.
///
/// `bmi` is recomputed from weight and height unless it came from the file or `--bmi`.
fn build_features(base: Option<FeatureRecord>, overrides: &FeatureOverrides) -> FeatureRecord {
    let bmi_given = base.is_some() || overrides.bmi.is_some();
    let base = base.unwrap_or_else(form_defaults);

    let mut features = FeatureRecord {
        age_years: overrides.age_years.unwrap_or(base.age_years),
        weight: overrides.weight.unwrap_or(base.weight),
        height: overrides.height.unwrap_or(base.height),
        bmi: overrides.bmi.unwrap_or(base.bmi),
        gender: overrides.gender.unwrap_or(base.gender),
        cholesterol: overrides.cholesterol.unwrap_or(base.cholesterol),
        gluc: overrides.gluc.unwrap_or(base.gluc),
        ap_hi: overrides.ap_hi.unwrap_or(base.ap_hi),
        ap_lo: overrides.ap_lo.unwrap_or(base.ap_lo),
        smoke: overrides.smoke.unwrap_or(base.smoke),
        alco: overrides.alco.unwrap_or(base.alco),
        active: overrides.active.unwrap_or(base.active),
    };

    if !bmi_given {
        features.bmi = body_mass_index(features.weight, features.height);
    }

    features
}

fn prediction_label(prediction: u8) -> &'static str {
    if prediction == 1 {
        "disease likely"
    } else {
        "disease unlikely"
    }
}

fn render_summary(
    out: &mut String,
    model: &str,
    features: &FeatureRecord,
    prediction: u8,
    probability: [f64; 2],
    risk_level: RiskLevel,
) {
    let _ = writeln!(out, "Cardiovascular risk assessment (model: {model})");
    let _ = writeln!(out, "{:<16} {:.1} kg/m2", "BMI", features.bmi);
    let _ = writeln!(out, "{:<16} {:.1}%", "P(disease)", probability[1] * 100.0);
    let _ = writeln!(out, "{:<16} {:.1}%", "P(no disease)", probability[0] * 100.0);
    let _ = writeln!(
        out,
        "{:<16} {} ({})",
        "Prediction",
        prediction,
        prediction_label(prediction)
    );
    let _ = writeln!(out, "{:<16} {}", "Risk level", risk_level.as_str());
}

fn render_local_table(features: &FeatureRecord, result: &ScoreResult) -> String {
    let mut out = String::new();
    render_summary(
        &mut out,
        "local",
        features,
        result.prediction,
        result.probability_pair(),
        result.risk_level,
    );
    let _ = writeln!(out, "{:<16} {:.3}", "Raw score", result.raw_score);
    out
}

fn render_remote_table(features: &FeatureRecord, prediction: &RemotePrediction) -> String {
    let mut out = String::new();
    render_summary(
        &mut out,
        &prediction.model,
        features,
        prediction.prediction,
        prediction.probability,
        prediction.risk_level,
    );
    out
}

fn render_local_json(result: &ScoreResult) -> Result<String, String> {
    let payload = serde_json::json!({
        "model": "local",
        "prediction": result.prediction,
        "probability": result.probability_pair(),
        "risk_level": result.risk_level,
        "raw_score": result.raw_score,
    });
    to_json_line(&payload)
}

fn render_remote_json(prediction: &RemotePrediction) -> Result<String, String> {
    let payload = serde_json::json!({
        "model": prediction.model,
        "prediction": prediction.prediction,
        "probability": prediction.probability,
        "risk_level": prediction.risk_level,
    });
    to_json_line(&payload)
}

fn to_json_line(payload: &Value) -> Result<String, String> {
    serde_json::to_string_pretty(payload)
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|err| format!("failed to render json: {err}"))
}
