use std::fmt;

/// Address of the client as reported by the reverse proxy headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAddress {
    Known(String),
    /// No usable header; the geolocation provider then locates the caller itself.
    Unknown,
}

impl ClientAddress {
    pub const FORWARDED_FOR: &'static str = "x-forwarded-for";
    pub const REAL_IP: &'static str = "x-real-ip";

    /// Prefer `x-forwarded-for`, then `x-real-ip`. Empty values count as missing.
    /// A proxy chain (`client, proxy1, proxy2`) resolves to its first entry.
    pub fn from_headers(forwarded_for: Option<&str>, real_ip: Option<&str>) -> Self {
        let raw = [forwarded_for, real_ip]
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty());

        let Some(raw) = raw else {
            return ClientAddress::Unknown;
        };

        let first = raw.split(',').next().unwrap_or_default().trim();
        if first.is_empty() {
            ClientAddress::Unknown
        } else {
            ClientAddress::Known(first.to_string())
        }
    }

    /// Path segment for the geolocation request; empty when unknown.
    pub fn as_query_segment(&self) -> &str {
        match self {
            ClientAddress::Known(addr) => addr,
            ClientAddress::Unknown => "",
        }
    }
}

impl fmt::Display for ClientAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientAddress::Known(addr) => f.write_str(addr),
            ClientAddress::Unknown => f.write_str("unknown"),
        }
    }
}
