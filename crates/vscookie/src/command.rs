use std::collections::BTreeMap;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::eyre;
use vs_cookie::{
    codec, create_cookie, get_cookie, parse, sign, verify, CookieOptions, CookiePrefix,
    GetCookieOptions, Priority, SameSite, SignOptions, VerifyOptions, DEFAULT_SEPARATOR,
};

use crate::{
    color::Color,
    render::{CommandOutput, CommandResult, Output},
};

pub const SECRET_ENV: &str = "VSCOOKIE_SECRET";

#[derive(Parser, Clone)]
#[command(name = "vscookie CLI", version, about = "Sign, verify, parse and build HTTP cookies", long_about = None, disable_version_flag = true)]
pub struct Cli {
    // Optional as a workaround for https://github.com/clap-rs/clap/issues/3572
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short = 'o', long, global = true, value_enum, default_value_t = Output::JSON)]
    pub output: Output,

    #[arg(short = 'c', long, global = true, value_enum, default_value_t = Color::Auto)]
    pub color: Color,

    #[arg(
        short = 'q',
        long,
        global = true,
        help = "Don't return anything to stdout."
    )]
    pub quiet: bool,

    #[arg(short = 'v', long, action = clap::builder::ArgAction::Version)]
    pub version: (),
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    #[command(long_about = "Sign a cookie value and print the encoded token.")]
    Sign(SignArgs),

    #[command(long_about = "Check the signature of a signed cookie. Prints true or false.")]
    Verify(VerifyArgs),

    #[command(long_about = "Parse a Cookie header into a name to value map.")]
    Parse {
        #[arg(help = "The Cookie header value, e.g. 'a=1; b=2'")]
        header: String,

        #[arg(long, help = "Do not percent-decode values.")]
        raw: bool,
    },

    #[command(long_about = "Read a single cookie from a Cookie header, checking its signature when a secret is given.")]
    Get(GetArgs),

    #[command(long_about = "Build a Set-Cookie header value.")]
    Create(CreateArgs),
}

#[derive(Args, Clone)]
pub struct SecretArgs {
    #[arg(
        long,
        env = SECRET_ENV,
        hide_env_values = true,
        help = "Secret used to sign the cookie."
    )]
    pub secret: String,

    #[arg(long, default_value_t = DEFAULT_SEPARATOR, help = "Separator between value and digest")]
    pub separator: char,

    #[arg(long, help = "Do not percent-encode the token.")]
    pub raw: bool,
}

#[derive(Args, Clone)]
pub struct SignArgs {
    pub value: String,

    #[command(flatten)]
    pub secret: SecretArgs,
}

#[derive(Args, Clone)]
pub struct VerifyArgs {
    pub token: String,

    #[command(flatten)]
    pub secret: SecretArgs,
}

#[derive(Args, Clone)]
pub struct GetArgs {
    #[arg(help = "The Cookie header value, e.g. 'a=1; b=2'")]
    pub header: String,

    pub name: String,

    #[arg(
        long,
        env = SECRET_ENV,
        hide_env_values = true,
        help = "Verify the signature and print only the signed value."
    )]
    pub secret: Option<String>,

    #[arg(long, default_value_t = DEFAULT_SEPARATOR, help = "Separator between value and digest")]
    pub separator: char,

    #[arg(long, help = "Do not percent-decode the value.")]
    pub raw: bool,
}

#[derive(Args, Clone)]
pub struct CreateArgs {
    pub name: String,

    pub value: String,

    #[arg(long)]
    pub path: Option<String>,

    #[arg(long)]
    pub domain: Option<String>,

    #[arg(long, action, help = "Hide the cookie from JavaScript")]
    pub http_only: bool,

    #[arg(long, allow_negative_numbers = true, help = "Seconds until the cookie expires")]
    pub max_age: Option<i64>,

    #[arg(long, help = "Name prefix: secure or host")]
    pub prefix: Option<CookiePrefix>,

    #[arg(long, default_value = "medium", help = "high, medium or low")]
    pub priority: Priority,

    #[arg(long, action, help = "Only send the cookie over HTTPS")]
    pub secure: bool,

    #[arg(long, help = "strict, lax or none. Requires --secure")]
    pub same_site: Option<SameSite>,

    #[arg(long, help = "Do not percent-encode the value.")]
    pub raw: bool,
}

impl SignArgs {
    pub fn run(self) -> CommandResult {
        let mut options = SignOptions::default().with_separator(self.secret.separator);
        if self.secret.raw {
            options = options.with_encode(codec::identity_encode);
        }

        let token = sign(&self.value, &self.secret.secret, options)?;
        Ok(token.into())
    }
}

impl VerifyArgs {
    pub fn run(self) -> CommandResult {
        let mut options = VerifyOptions::default().with_separator(self.secret.separator);
        if self.secret.raw {
            options = options.with_decode(codec::identity_decode);
        }

        let valid = verify(&self.token, &self.secret.secret, options)?;
        tracing::debug!(valid, "Verified cookie signature");
        Ok(valid.to_string().into())
    }
}

pub fn run_parse(header: &str, raw: bool) -> CommandResult {
    let decode: codec::Decoder = if raw {
        codec::identity_decode
    } else {
        codec::decode_uri_component
    };

    let cookies: BTreeMap<String, String> = parse(header, decode)?.into_iter().collect();
    Ok(CommandOutput::Object(Box::new(cookies)))
}

impl GetArgs {
    pub fn run(self) -> CommandResult {
        let mut options = GetCookieOptions::default().with_separator(self.separator);
        if self.raw {
            options = options.with_decode(codec::identity_decode);
        }
        if let Some(secret) = self.secret.as_deref() {
            options = options.with_secret(secret);
        }

        match get_cookie(&self.header, &self.name, options)? {
            Some(value) => Ok(value.into()),
            None => Err(eyre!("Cookie not found: {}", self.name)),
        }
    }
}

impl CreateArgs {
    pub fn run(self) -> CommandResult {
        let mut options = CookieOptions::new(self.name, self.value)
            .with_http_only(self.http_only)
            .with_priority(self.priority)
            .with_secure(self.secure);
        if self.raw {
            options = options.with_encode(codec::identity_encode);
        }
        if let Some(path) = self.path {
            options = options.with_path(path);
        }
        if let Some(domain) = self.domain {
            options = options.with_domain(domain);
        }
        if let Some(max_age) = self.max_age {
            options = options.with_max_age(max_age);
        }
        if let Some(prefix) = self.prefix {
            options = options.with_prefix(prefix);
        }
        if let Some(same_site) = self.same_site {
            options = options.with_same_site(same_site);
        }

        Ok(create_cookie(&options)?.into())
    }
}
