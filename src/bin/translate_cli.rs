use std::io::{self, Read};
use std::sync::Arc;

use scitrans_gateway::{GatewayError, TranslationGateway};
use scitrans_gateway::api::{ErrorBody, TranslateResponseBody};
use scitrans_gateway::config::{EnvCredentials, GatewayConfig};
use scitrans_gateway::core::types::TranslationRequest;
use scitrans_gateway::providers;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: translate_cli --model <id> --target <lang> [--source <lang>] \
[--style <id>] [--temperature <0..1>] [--max-tokens <n>] [--show-changes] \
[--no-preserve-format] [--no-improve-grammar] [--estimate] | --list-models";

struct CliConfig {
    model: String,
    target: String,
    source: Option<String>,
    style: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    preserve_format: bool,
    improve_grammar: bool,
    show_changes: bool,
    estimate: bool,
    list_models: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = parse_config(std::env::args().skip(1).collect())?;
    let gateway = build_gateway()?;

    if cli.list_models {
        for model in gateway.registry().descriptors() {
            let marker = if gateway.registry().is_available(&model.id) {
                "*"
            } else {
                " "
            };
            println!(
                "{marker} {:<16} {:<12} {}",
                model.id,
                model.provider.as_str(),
                model.wire_model
            );
        }
        println!("styles: {}", gateway.styles().style_ids().join(", "));
        return Ok(());
    }

    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;

    let mut request = TranslationRequest::new(text.trim_end(), cli.target, cli.model.clone())
        .with_flags(cli.preserve_format, cli.improve_grammar, cli.show_changes);
    if let Some(source) = cli.source {
        request = request.with_source_language(source);
    }
    if let Some(style) = cli.style {
        request = request.with_style(style);
    }
    if let Some(temperature) = cli.temperature {
        request = request.with_temperature(temperature);
    }
    if let Some(max_tokens) = cli.max_tokens {
        request = request.with_max_output_tokens(max_tokens);
    }

    if cli.estimate {
        return match gateway.estimate(&request) {
            Ok(estimate) => {
                println!("{}", serde_json::to_string_pretty(&estimate)?);
                Ok(())
            }
            Err(error) => exit_with(&error),
        };
    }

    match gateway.translate(&request).await {
        Ok(result) => {
            let body = TranslateResponseBody::new(&cli.model, &result);
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Err(error) => exit_with(&error),
    }
}

fn exit_with(error: &GatewayError) -> ! {
    match serde_json::to_string_pretty(&ErrorBody::from(error)) {
        Ok(body) => println!("{body}"),
        Err(_) => eprintln!("{error}"),
    }
    std::process::exit(if error.status_code() >= 500 { 2 } else { 1 });
}

/// Availability follows the live process environment.
fn build_gateway() -> Result<TranslationGateway, Box<dyn std::error::Error>> {
    let config = GatewayConfig::from_env()?;
    let mut builder = TranslationGateway::builder().with_credentials(Arc::new(EnvCredentials));
    for adapter in providers::adapters_from_config(&config)? {
        builder = builder.with_adapter(adapter);
    }
    Ok(builder.build())
}

fn parse_config(args: Vec<String>) -> Result<CliConfig, String> {
    let mut model = None;
    let mut target = None;
    let mut cli = CliConfig {
        model: String::new(),
        target: String::new(),
        source: None,
        style: None,
        temperature: None,
        max_tokens: None,
        preserve_format: true,
        improve_grammar: true,
        show_changes: false,
        estimate: false,
        list_models: false,
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--model" => model = Some(next_value(&mut args, "--model")?),
            "--target" => target = Some(next_value(&mut args, "--target")?),
            "--source" => cli.source = Some(next_value(&mut args, "--source")?),
            "--style" => cli.style = Some(next_value(&mut args, "--style")?),
            "--temperature" => {
                let raw = next_value(&mut args, "--temperature")?;
                cli.temperature = Some(
                    raw.parse()
                        .map_err(|_| format!("invalid --temperature value: {raw}"))?,
                );
            }
            "--max-tokens" => {
                let raw = next_value(&mut args, "--max-tokens")?;
                cli.max_tokens = Some(
                    raw.parse()
                        .map_err(|_| format!("invalid --max-tokens value: {raw}"))?,
                );
            }
            "--show-changes" => cli.show_changes = true,
            "--no-preserve-format" => cli.preserve_format = false,
            "--no-improve-grammar" => cli.improve_grammar = false,
            "--estimate" => cli.estimate = true,
            "--list-models" => cli.list_models = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            other => return Err(format!("unknown argument: {other}\n{USAGE}")),
        }
    }

    if cli.list_models {
        return Ok(cli);
    }

    cli.model = model.ok_or_else(|| format!("--model is required\n{USAGE}"))?;
    cli.target = target.ok_or_else(|| format!("--target is required\n{USAGE}"))?;
    Ok(cli)
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next()
        .ok_or_else(|| format!("missing value for {flag}"))
}
