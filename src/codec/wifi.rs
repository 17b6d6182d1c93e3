//! Wi-Fi network credentials (`WIFI:` URI).
//!
//! Grammar: `WIFI:T:<WPA|WEP|nopass>;S:<ssid>;P:<password>;H:<true|false>;;`

use super::PayloadCodec;
use crate::domain::{char_len, Limits, Patterns};
use crate::error::{PayloadError, PayloadResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WifiSecurity {
    #[serde(rename = "WPA", alias = "wpa", alias = "WPA2")]
    Wpa,
    #[serde(rename = "WPA3", alias = "wpa3")]
    Wpa3,
    #[serde(rename = "WEP", alias = "wep")]
    Wep,
    #[serde(rename = "nopass", alias = "none", alias = "open")]
    NoPass,
}

impl WifiSecurity {
    /// Value of the `T:` field. Scanners do not know WPA3, so it is sent as WPA.
    pub fn wire_value(&self) -> &'static str {
        match self {
            Self::Wpa | Self::Wpa3 => "WPA",
            Self::Wep => "WEP",
            Self::NoPass => "nopass",
        }
    }
}

impl fmt::Display for WifiSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Wpa => "WPA",
            Self::Wpa3 => "WPA3",
            Self::Wep => "WEP",
            Self::NoPass => "nopass",
        };
        f.write_str(name)
    }
}

impl FromStr for WifiSecurity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wpa" | "wpa2" => Ok(Self::Wpa),
            "wpa3" => Ok(Self::Wpa3),
            "wep" => Ok(Self::Wep),
            "nopass" | "none" | "open" => Ok(Self::NoPass),
            other => Err(format!("unknown Wi-Fi security '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiCredentials {
    pub ssid: String,
    #[serde(default)]
    pub password: Option<String>,
    pub security: WifiSecurity,
    #[serde(default)]
    pub hidden: bool,
}

impl WifiCredentials {
    pub fn new(ssid: impl Into<String>, password: Option<&str>, security: WifiSecurity) -> Self {
        Self {
            ssid: ssid.into(),
            password: password.map(str::to_string),
            security,
            hidden: false,
        }
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// Backslash-escapes `\`, `;`, `,` and `"`. The backslash goes first so the
/// escapes added for the other characters are not escaped again.
pub fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('"', "\\\"")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WifiCodec;

impl WifiCodec {
    fn validate_ssid(ssid: &str) -> PayloadResult<()> {
        if ssid.is_empty() {
            return Err(PayloadError::missing("ssid", "network name is required"));
        }
        if ssid.contains('\n') || ssid.contains('\r') {
            return Err(PayloadError::format(
                "ssid",
                "network name cannot contain line breaks",
            ));
        }
        if char_len(ssid) > Limits::SSID_MAX_CHARS {
            return Err(PayloadError::format(
                "ssid",
                format!(
                    "network name must be at most {} characters",
                    Limits::SSID_MAX_CHARS
                ),
            ));
        }
        Ok(())
    }

    fn validate_password(security: WifiSecurity, password: &str) -> PayloadResult<()> {
        match security {
            WifiSecurity::NoPass => Ok(()),
            WifiSecurity::Wpa | WifiSecurity::Wpa3 => {
                let len = char_len(password);
                if (Limits::WPA_PASSWORD_MIN..=Limits::WPA_PASSWORD_MAX).contains(&len) {
                    Ok(())
                } else {
                    Err(PayloadError::format(
                        "password",
                        format!(
                            "{} password must be {}-{} characters",
                            security,
                            Limits::WPA_PASSWORD_MIN,
                            Limits::WPA_PASSWORD_MAX
                        ),
                    ))
                }
            }
            WifiSecurity::Wep => {
                if Patterns::wep_password().is_match(password) {
                    Ok(())
                } else {
                    Err(PayloadError::format(
                        "password",
                        "WEP password must be 5 or 13 ASCII characters, or 10 or 26 hex digits",
                    ))
                }
            }
        }
    }
}

impl PayloadCodec for WifiCodec {
    type Input = WifiCredentials;

    fn name(&self) -> &'static str {
        "wifi"
    }

    fn validate(&self, input: &WifiCredentials) -> PayloadResult<()> {
        Self::validate_ssid(&input.ssid)?;

        if input.security == WifiSecurity::NoPass {
            return Ok(());
        }

        match input.password.as_deref().filter(|p| !p.is_empty()) {
            Some(password) => Self::validate_password(input.security, password),
            None => Err(PayloadError::missing(
                "password",
                format!("a password is required for {} networks", input.security),
            )),
        }
    }

    fn render(&self, input: &WifiCredentials) -> PayloadResult<String> {
        let mut payload = format!(
            "WIFI:T:{};S:{};",
            input.security.wire_value(),
            escape(&input.ssid)
        );

        if input.security != WifiSecurity::NoPass {
            let password = input.password.as_deref().unwrap_or_default();
            payload.push_str(&format!("P:{};", escape(password)));
        }

        payload.push_str(&format!("H:{};;", input.hidden));
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_wpa_encoding() {
        let creds = WifiCredentials::new("Home", Some("password123"), WifiSecurity::Wpa);
        assert_eq!(
            WifiCodec.encode(&creds).unwrap(),
            "WIFI:T:WPA;S:Home;P:password123;H:false;;"
        );
    }

    #[test]
    fn test_wpa3_sent_as_wpa() {
        let creds =
            WifiCredentials::new("Home", Some("password123"), WifiSecurity::Wpa3).hidden(true);
        assert_eq!(
            WifiCodec.encode(&creds).unwrap(),
            "WIFI:T:WPA;S:Home;P:password123;H:true;;"
        );
    }

    #[test]
    fn test_nopass_omits_password() {
        let creds = WifiCredentials::new("Cafe", Some("ignored"), WifiSecurity::NoPass);
        assert_eq!(
            WifiCodec.encode(&creds).unwrap(),
            "WIFI:T:nopass;S:Cafe;H:false;;"
        );
    }

    #[test]
    fn test_escaping_order() {
        assert_eq!(escape(r#"a\b;c,d"e"#), r#"a\\b\;c\,d\"e"#);
        assert_eq!(escape(r"\;"), r"\\\;");
    }

    #[test]
    fn test_missing_password() {
        let creds = WifiCredentials::new("Home", None, WifiSecurity::Wep);
        let err = WifiCodec.validate(&creds).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
        assert_eq!(err.field(), "password");
    }

    #[test]
    fn test_ssid_with_line_break() {
        let creds = WifiCredentials::new("Home\nNet", Some("password123"), WifiSecurity::Wpa);
        assert_eq!(
            WifiCodec.validate(&creds).unwrap_err().kind(),
            ErrorKind::FormatInvalid
        );
    }
}
