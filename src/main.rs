//! QR payload CLI application.
//!
//! Builds QR payload strings from command-line arguments or a JSON request
//! and prints them to stdout, ready to pipe into a QR renderer.

use anyhow::{Context, Result};
use chrono::{FixedOffset, NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use qrpayload::{
    CalendarEvent, ContactCard, Coordinate, EmailIntent, EncodingRequest, EventCodec, EventZone,
    GeoCodec, MessagingIntent, MessagingPlatform, PaymentCodec, PaymentInstruction, PaymentKind,
    PlainText, TextCodec, WifiCredentials, WifiSecurity,
};

/// QR Payload Tool
///
/// Encode structured data (Wi-Fi, contacts, events, locations, messages,
/// emails, payments, text) into QR-ready payload strings.
#[derive(Parser)]
#[command(name = "qrpayload")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// UTC offset for event times, e.g. +02:00 (defaults to the system zone)
    #[arg(long, global = true, env = "QRPAYLOAD_UTC_OFFSET", value_parser = parse_utc_offset)]
    utc_offset: Option<FixedOffset>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wi-Fi network credentials
    Wifi {
        #[arg(long)]
        ssid: String,
        #[arg(long)]
        password: Option<String>,
        /// WPA, WPA3, WEP or nopass
        #[arg(long, default_value = "WPA")]
        security: WifiSecurity,
        /// Network does not broadcast its SSID
        #[arg(long)]
        hidden: bool,
    },

    /// Contact card (vCard 3.0)
    Contact(ContactArgs),

    /// Calendar event (iCalendar)
    Event(EventArgs),

    /// Coordinates as a geo: URI
    Geo {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Extract coordinates from a map link and print the geo: URI
    Locate {
        /// Full map URL (short links must be expanded first)
        url: String,
    },

    /// SMS, WhatsApp or phone-call intent
    Message {
        /// sms, whatsapp or phone
        #[arg(long, default_value = "sms")]
        platform: MessagingPlatform,
        #[arg(long)]
        phone: String,
        /// Prefilled message (sms and whatsapp only)
        #[arg(long)]
        text: Option<String>,
    },

    /// Email (mailto:)
    Email {
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },

    /// Payment link or URI
    Pay(PayArgs),

    /// Plain text
    Text {
        /// Text to encode, or '-' to read stdin
        content: String,
    },

    /// Print the complexity estimate for a text
    Analyze {
        /// Text to analyze, or '-' to read stdin
        content: String,
    },

    /// Decode a payment payload into JSON
    Decode {
        payload: String,
    },

    /// Encode a JSON request (tagged by "tool")
    Request {
        /// JSON file, or '-' for stdin
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Args)]
struct ContactArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    org: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    street: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    zip: Option<String>,
    #[arg(long)]
    country: Option<String>,
}

#[derive(Args)]
struct EventArgs {
    #[arg(long)]
    title: String,
    /// YYYY-MM-DD
    #[arg(long)]
    start_date: NaiveDate,
    /// HH:MM
    #[arg(long, value_parser = parse_time)]
    start_time: Option<NaiveTime>,
    /// YYYY-MM-DD (defaults to the start date)
    #[arg(long)]
    end_date: Option<NaiveDate>,
    /// HH:MM
    #[arg(long, value_parser = parse_time)]
    end_time: Option<NaiveTime>,
    #[arg(long)]
    all_day: bool,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// "Name <email>" or just a name
    #[arg(long)]
    organizer: Option<String>,
    #[arg(long)]
    url: Option<String>,
}

#[derive(Args)]
struct PayArgs {
    /// paypal, bitcoin, ethereum, upi, iban or url
    #[arg(long)]
    kind: PaymentKind,
    /// Username, address, UPI ID, IBAN or URL depending on the kind
    #[arg(long)]
    to: String,
    /// Payee name (upi) or beneficiary (iban)
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    amount: Option<f64>,
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| format!("'{}' is not a time (expected HH:MM)", value))
}

/// Accepts `Z`, `UTC`, `+HH:MM`, `-HH:MM`, `+HHMM` and `+HH`.
fn parse_utc_offset(value: &str) -> Result<FixedOffset, String> {
    let invalid = || format!("'{}' is not a UTC offset (expected e.g. +02:00)", value);
    let value = value.trim();

    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match value.chars().next() {
        Some('+') => (1, &value[1..]),
        Some('-') => (-1, &value[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let (hours, minutes) = match digits.len() {
        2 => (&digits[..2], "0"),
        4 => (&digits[..2], &digits[2..]),
        _ => return Err(invalid()),
    };
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 18 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Reads `value`, or stdin when it is `-`.
fn read_arg_or_stdin(value: &str) -> Result<String> {
    if value == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        Ok(buffer)
    } else {
        Ok(value.to_string())
    }
}

/// Builds a payment instruction from the flat `pay` arguments.
fn build_payment(args: &PayArgs) -> PaymentInstruction {
    let to = args.to.clone();
    let name = args.name.clone().unwrap_or_default();
    let amount = args.amount;

    match args.kind {
        PaymentKind::Paypal => PaymentInstruction::Paypal {
            username: to,
            amount,
        },
        PaymentKind::Bitcoin => PaymentInstruction::Bitcoin {
            address: to,
            amount,
        },
        PaymentKind::Ethereum => PaymentInstruction::Ethereum {
            address: to,
            amount,
        },
        PaymentKind::Upi => PaymentInstruction::Upi {
            id: to,
            name,
            amount,
        },
        PaymentKind::Iban => PaymentInstruction::Iban {
            code: to,
            beneficiary: name,
            amount,
        },
        PaymentKind::Url => PaymentInstruction::Url { url: to },
    }
}

fn build_event(args: EventArgs) -> CalendarEvent {
    CalendarEvent {
        title: args.title,
        start_date: Some(args.start_date),
        start_time: args.start_time,
        end_date: Some(args.end_date.unwrap_or(args.start_date)),
        end_time: args.end_time,
        all_day: args.all_day,
        location: args.location,
        description: args.description,
        organizer: args.organizer,
        url: args.url,
    }
}

fn build_contact(args: ContactArgs) -> ContactCard {
    ContactCard {
        first_name: args.first_name,
        last_name: args.last_name,
        organization: args.org,
        title: args.title,
        phone: args.phone,
        email: args.email,
        url: args.url,
        street: args.street,
        city: args.city,
        state: args.state,
        zip: args.zip,
        country: args.country,
    }
}

/// Command handler holding the configured event codec.
struct PayloadHandler {
    events: EventCodec,
}

impl PayloadHandler {
    fn new(utc_offset: Option<FixedOffset>) -> Self {
        let zone = utc_offset.map(EventZone::Fixed).unwrap_or_default();
        Self {
            events: EventCodec::new(zone),
        }
    }

    /// Encodes a request, attaching the tool name to any failure.
    fn encode(&self, request: EncodingRequest) -> Result<String> {
        request
            .encode_with(&self.events)
            .with_context(|| format!("Could not encode {} payload", request.tool()))
    }

    fn run(&self, command: Commands) -> Result<String> {
        let request = match command {
            Commands::Wifi {
                ssid,
                password,
                security,
                hidden,
            } => EncodingRequest::Wifi(WifiCredentials {
                ssid,
                password,
                security,
                hidden,
            }),
            Commands::Contact(args) => EncodingRequest::Contact(build_contact(args)),
            Commands::Event(args) => EncodingRequest::Event(build_event(args)),
            Commands::Geo { lat, lon } => EncodingRequest::Geo(Coordinate::new(lat, lon)),
            Commands::Locate { url } => {
                let point = GeoCodec
                    .parse_maps_url(&url)
                    .context("Could not read coordinates from the map link")?;
                EncodingRequest::Geo(point)
            }
            Commands::Message {
                platform,
                phone,
                text,
            } => EncodingRequest::Messaging(MessagingIntent {
                platform,
                phone,
                message: text,
            }),
            Commands::Email { to, subject, body } => EncodingRequest::Email(EmailIntent {
                recipient: to,
                subject,
                body,
            }),
            Commands::Pay(args) => EncodingRequest::Payment(build_payment(&args)),
            Commands::Text { content } => {
                EncodingRequest::Text(PlainText::new(read_arg_or_stdin(&content)?))
            }
            Commands::Analyze { content } => {
                let text = read_arg_or_stdin(&content)?;
                let complexity = TextCodec::default().complexity(&text);
                return serde_json::to_string_pretty(&complexity)
                    .context("Failed to serialize complexity");
            }
            Commands::Decode { payload } => {
                let instruction = PaymentCodec
                    .decode(&payload)
                    .context("Could not decode payment payload")?;
                return serde_json::to_string_pretty(&instruction)
                    .context("Failed to serialize payment instruction");
            }
            Commands::Request { file } => {
                let json = if file.as_os_str() == "-" {
                    read_arg_or_stdin("-")?
                } else {
                    std::fs::read_to_string(&file)
                        .with_context(|| format!("Failed to read {}", file.display()))?
                };
                serde_json::from_str(&json).context("Invalid request JSON")?
            }
        };

        self.encode(request)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let handler = PayloadHandler::new(cli.utc_offset);
    let output = handler.run(cli.command)?;
    println!("{}", output);

    Ok(())
}
