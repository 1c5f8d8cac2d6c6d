use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "buy4",
    version,
    about = "buy4industry back-office client",
    long_about = "buy4 drives the buy4industry detail and search endpoints from the terminal, renders the responses the way the back-office pages do and checks form input against the submit guards.\n\nExamples:\n  buy4 --origin http://localhost:8000/ quotation 12 13\n  buy4 --cookie \"sessionid=...; csrftoken=...\" order 7\n  buy4 validate customer-form --field p_email=x@y.com\n  buy4 csrf POST /enquiry/add/\n\nTip: Use init-config once, then keep origin and cookie in ~/.buy4industry/config.yml."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FORMAT",
        global = true,
        help_heading = "Output",
        help = "Output format: text or json."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.buy4industry/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "origin",
        value_name = "URL",
        global = true,
        help_heading = "Connection",
        help = "Page URL requests are issued from."
    )]
    pub origin: Option<String>,

    #[arg(
        long = "cookie",
        value_name = "HEADER",
        global = true,
        help_heading = "Connection",
        help = "Raw Cookie header, e.g. \"sessionid=...; csrftoken=...\"."
    )]
    pub cookie: Option<String>,

    #[arg(
        long = "csrf-cookie",
        value_name = "NAME",
        global = true,
        help_heading = "Connection",
        help = "Cookie holding the anti-forgery token (default csrftoken)."
    )]
    pub csrf_cookie: Option<String>,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        global = true,
        help_heading = "Connection",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long = "user-agent",
        value_name = "UA",
        global = true,
        help_heading = "Connection",
        help = "User-Agent header."
    )]
    pub user_agent: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch and render quotation details.
    Quotation {
        #[arg(value_name = "ID", required = true)]
        ids: Vec<String>,
    },

    /// Fetch and render order details.
    Order {
        #[arg(value_name = "ID", required = true)]
        ids: Vec<String>,
    },

    /// List the email addresses on file for a customer.
    Emails {
        #[arg(value_name = "CUSTOMER_ID")]
        customer_id: String,
    },

    /// Search customers by company name.
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// Run a form's submit guard over the given field values.
    Validate {
        #[arg(value_name = "FORM")]
        form: String,

        #[arg(
            short = 'f',
            long = "field",
            value_name = "NAME=VALUE",
            action = ArgAction::Append
        )]
        fields: Vec<String>,
    },

    /// Show whether a request would carry the anti-forgery header.
    Csrf {
        #[arg(value_name = "METHOD")]
        method: String,

        #[arg(value_name = "URL")]
        url: String,
    },

    /// Write the default config file if it does not exist.
    InitConfig,
}
