use crate::cli::args::{CliArgs, Command};
use crate::output::OutputFormat;
use crate::validation;

pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid --field '{raw}', expected NAME=VALUE"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("invalid --field '{raw}', empty name"));
    }
    Ok((name.to_string(), value.to_string()))
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.output.as_deref() {
        OutputFormat::parse(raw).ok_or_else(|| format!("invalid --output '{raw}', expected text or json"))?;
    }
    if args.timeout == Some(0) {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    if let Some(raw) = args.origin.as_deref() {
        reqwest::Url::parse(raw).map_err(|e| format!("invalid --origin '{raw}': {e}"))?;
    }
    match &args.command {
        Command::Quotation { ids } | Command::Order { ids } => {
            if ids.iter().any(|id| id.trim().is_empty()) {
                return Err("empty id".to_string());
            }
        }
        Command::Emails { customer_id } if customer_id.trim().is_empty() => {
            return Err("empty customer id".to_string());
        }
        Command::Validate { form, fields } => {
            if validation::form(form).is_none() {
                let known = validation::FORMS
                    .iter()
                    .map(|f| f.name)
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(format!("unknown form '{form}', expected one of: {known}"));
            }
            for raw in fields {
                parse_field(raw)?;
            }
        }
        Command::Csrf { method, .. } => {
            reqwest::Method::from_bytes(method.trim().as_bytes())
                .map_err(|_| format!("invalid method '{method}'"))?;
        }
        _ => {}
    }
    Ok(())
}
