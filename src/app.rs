use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::actions;
use crate::api::{ApiClient, ApiError, ClientOptions};
use crate::cli::args::{CliArgs, Command};
use crate::cli::validation;
use crate::config::{self, ConfigFile, PageContext, DEFAULT_CSRF_COOKIE};
use crate::csrf::{self, CookieSource, CSRF_HEADER};
use crate::output::{self, OutputFormat, PaneReport};
use crate::page::{Element, MemoryPage, Page, LOADER};
use crate::render::targets;

const DEFAULT_ORIGIN: &str = "http://localhost:8000/";

#[derive(Clone, Debug)]
struct RunConfig {
    command: Command,
    origin: String,
    cookie: String,
    csrf_cookie: String,
    timeout: u64,
    user_agent: Option<String>,
    output: OutputFormat,
    no_color: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let output_raw = args
        .output
        .or(cfg.output_format)
        .unwrap_or_else(|| "text".to_string());
    let output = OutputFormat::parse(&output_raw)
        .ok_or_else(|| format!("invalid output format '{output_raw}'"))?;

    let origin = args
        .origin
        .or(cfg.origin)
        .unwrap_or_else(|| DEFAULT_ORIGIN.to_string());

    Ok(RunConfig {
        command: args.command,
        origin,
        cookie: args.cookie.or(cfg.cookie).unwrap_or_default(),
        csrf_cookie: args
            .csrf_cookie
            .or(cfg.csrf_cookie_name)
            .unwrap_or_else(|| DEFAULT_CSRF_COOKIE.to_string()),
        timeout: args.timeout.or(cfg.timeout).unwrap_or(10),
        user_agent: args.user_agent.or(cfg.user_agent),
        output,
        no_color: args.no_color || cfg.no_color.unwrap_or(false),
    })
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("buy4industry_web={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn detail_page(origin: &str) -> MemoryPage {
    let page = MemoryPage::new(origin);
    page.append(None, Element::new("div").class(&LOADER[1..]).hidden());

    for target in targets::QUOTATION.iter().chain(targets::ORDER.iter()) {
        if page.first(target).is_none() {
            page.append(None, Element::new("div").id(&target[1..]));
        }
    }

    let block = page.append(None, Element::new("div").class("email-hide").hidden());
    page.append(Some(block), Element::new("div").id(&targets::COMPANY_EMAILS[1..]));

    let search = page.append(None, Element::new("div").id("search-input"));
    page.append(Some(search), Element::new("input"));
    page.append(None, Element::new("input").id(&actions::SELECTED_CUSTOMER[1..]));
    let panel = page.append(None, Element::new("div").id(&targets::SEARCH_PANEL[1..]).hidden());
    page.append(Some(panel), Element::new("ul"));
    page
}

fn spinner(message: &str) -> Result<ProgressBar, String> {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template(":: {spinner} {msg} :: [{elapsed_precise}]")
            .map_err(|e| format!("failed to build spinner style: {e}"))?,
    );
    pb.set_message(message.to_string());
    Ok(pb)
}

fn api_client(run: &RunConfig) -> Result<ApiClient, String> {
    let context = PageContext::from_location(&run.origin, None).map_err(|e| e.to_string())?;
    let options = ClientOptions {
        cookies: CookieSource::new(run.cookie.clone()).with_token_cookie(run.csrf_cookie.clone()),
        timeout_seconds: run.timeout,
        user_agent: run.user_agent.clone(),
    };
    ApiClient::new(context, options).map_err(|e| e.to_string())
}

fn report(
    subject: String,
    outcome: Result<(), ApiError>,
    page: &MemoryPage,
    captured: &[&str],
) -> PaneReport {
    PaneReport {
        subject,
        ok: outcome.is_ok(),
        error: outcome.err().map(|e| e.to_string()),
        fields: output::capture(page, captured),
    }
}

async fn fetch_each<'a, F, Fut>(
    origin: &'a str,
    kind: &'static str,
    ids: &'a [String],
    captured: &'a [&'static str],
    action: F,
) -> Vec<PaneReport>
where
    F: Fn(MemoryPage, String) -> Fut,
    Fut: Future<Output = (MemoryPage, Result<(), ApiError>)> + 'a,
{
    let runs = ids.iter().map(|id| {
        let page = detail_page(origin);
        let fut = action(page, id.trim().to_string());
        async move {
            let (page, outcome) = fut.await;
            report(format!("{kind} {}", id.trim()), outcome, &page, captured)
        }
    });
    join_all(runs).await
}

async fn run_fetch(run: &RunConfig) -> Result<Vec<PaneReport>, String> {
    let api = api_client(run)?;
    let api = &api;
    let origin = run.origin.as_str();

    let pb = spinner(&format!("requesting {}", api.context().host))?;
    let reports = match &run.command {
        Command::Quotation { ids } => {
            fetch_each(origin, "quotation", ids, &targets::QUOTATION, |page, id| async move {
                let outcome = actions::show_quotation(&page, api, &id).await;
                (page, outcome)
            })
            .await
        }
        Command::Order { ids } => {
            fetch_each(origin, "order", ids, &targets::ORDER, |page, id| async move {
                let outcome = actions::show_order(&page, api, &id).await;
                (page, outcome)
            })
            .await
        }
        Command::Emails { customer_id } => {
            let page = detail_page(origin);
            let outcome = actions::show_customer_emails(&page, api, customer_id.trim())
                .await
                .map(|count| debug!("{count} addresses"));
            vec![report(
                format!("customer {}", customer_id.trim()),
                outcome,
                &page,
                &[targets::EMAIL_BLOCK, targets::COMPANY_EMAILS],
            )]
        }
        Command::Search { query } => {
            let page = detail_page(origin);
            page.set_value_all(actions::SEARCH_INPUT, query);
            let outcome = actions::search_customers(&page, api)
                .await
                .map(|count| debug!("{count} hits"));
            let panel_visible = page
                .first(targets::SEARCH_PANEL)
                .is_some_and(|node| page.is_visible(&node));
            let mut r = report(format!("search {query:?}"), outcome, &page, &[targets::SEARCH_LIST]);
            for field in r.fields.iter_mut() {
                field.visible = panel_visible;
            }
            vec![r]
        }
        _ => Vec::new(),
    };
    pb.finish_and_clear();
    Ok(reports)
}

fn print_reports(run: &RunConfig, reports: &[PaneReport]) {
    match run.output {
        OutputFormat::Text => print!("{}", output::render_text(reports)),
        OutputFormat::Json => println!("{}", String::from_utf8_lossy(&output::render_json(reports))),
    }
}

fn run_validate(run: &RunConfig, form_name: &str, raw_fields: &[String]) -> Result<(), String> {
    let form = crate::validation::form(form_name).ok_or_else(|| format!("unknown form '{form_name}'"))?;
    let mut fields = BTreeMap::new();
    for raw in raw_fields {
        let (name, value) = validation::parse_field(raw)?;
        fields.insert(name, value);
    }
    let mut messages: BTreeMap<&'static str, String> = BTreeMap::new();
    let verdict = crate::validation::validate(form, &fields, &mut messages);

    match run.output {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "form": form.name,
                "submit": verdict.allows_submit(),
                "messages": messages,
            });
            println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
        }
        OutputFormat::Text => {
            for (target, message) in messages.iter() {
                if message.is_empty() {
                    println!(":: {:<18}: {}", target.cyan(), "ok".green());
                } else {
                    println!(":: {:<18}: {}", target.cyan(), message.red());
                }
            }
        }
    }

    match verdict {
        crate::validation::Verdict::Submit => Ok(()),
        crate::validation::Verdict::Block { field, error } => {
            Err(format!("{} would not submit: {field}: {error}", form.name))
        }
    }
}

fn run_csrf(run: &RunConfig, method: &str, target: &str) -> Result<(), String> {
    let context = PageContext::from_location(&run.origin, None).map_err(|e| e.to_string())?;
    let method = method.trim().to_uppercase();
    let cookies = CookieSource::new(run.cookie.clone()).with_token_cookie(run.csrf_cookie.clone());
    let needed = csrf::needs_token(&method, &context.page_url, target);
    let token = cookies.token();
    let attached = needed && token.is_some();

    match run.output {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "method": method,
                "url": target,
                "same_origin": csrf::is_same_origin(&context.page_url, target),
                "safe_method": csrf::is_safe_method(&method),
                "header": if attached { Some(CSRF_HEADER) } else { None },
            });
            println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
        }
        OutputFormat::Text => {
            if attached {
                println!("{} {}: {}", method.bold(), target, CSRF_HEADER.green());
            } else if needed {
                println!(
                    "{} {}: {} (no {} cookie)",
                    method.bold(),
                    target,
                    "header needed".yellow(),
                    run.csrf_cookie
                );
            } else {
                println!("{} {}: {}", method.bold(), target, "no header".white());
            }
        }
    }
    Ok(())
}

fn run_init_config(path: Option<PathBuf>) -> Result<(), String> {
    let path = path
        .or_else(config::default_config_path)
        .ok_or_else(|| "cannot determine home directory for the config file".to_string())?;
    if config::ensure_default_config_file(&path)? {
        println!(":: created {}", path.display());
    } else {
        println!(":: {} already exists", path.display());
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_tracing(args.verbose);

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    if args.command == Command::InitConfig {
        return run_init_config(user_config_path);
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    if run.no_color {
        colored::control::set_override(false);
    }
    info!("origin {}", run.origin);

    match &run.command {
        Command::Validate { form, fields } => run_validate(&run, form, fields),
        Command::Csrf { method, url } => run_csrf(&run, method, url),
        Command::InitConfig => Ok(()),
        _ => {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| format!("failed to build runtime: {e}"))?;
            let reports = rt.block_on(run_fetch(&run))?;
            print_reports(&run, &reports);
            let failed = reports.iter().filter(|r| !r.ok).count();
            if failed > 0 {
                return Err(format!("{failed} of {} requests failed", reports.len()));
            }
            Ok(())
        }
    }
}
