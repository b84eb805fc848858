// Feed catalog - the fixed set of feeds polled every refresh cycle
use crate::domain::query_mode::ResolvedParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Summary,
    Latest,
    Glossary,
    Series,
    GpsSeries,
    Track,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Summary => "/api/summary",
            Endpoint::Latest => "/api/latest",
            Endpoint::Glossary => "/api/glossary",
            Endpoint::Series => "/api/series",
            Endpoint::GpsSeries => "/api/series_gps",
            Endpoint::Track => "/api/gps_track",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedDescriptor {
    pub name: &'static str,
    pub endpoint: Endpoint,
    pub metric: Option<&'static str>,
    pub band: Option<&'static str>,
    /// Whether historical-day aggregation applies to this feed.
    pub aggregated: bool,
}

const fn fixed(name: &'static str, endpoint: Endpoint) -> FeedDescriptor {
    FeedDescriptor { name, endpoint, metric: None, band: None, aggregated: false }
}

const fn gps(name: &'static str, metric: &'static str) -> FeedDescriptor {
    FeedDescriptor {
        name,
        endpoint: Endpoint::GpsSeries,
        metric: Some(metric),
        band: None,
        aggregated: true,
    }
}

const fn rf(name: &'static str, metric: &'static str, band: &'static str) -> FeedDescriptor {
    FeedDescriptor {
        name,
        endpoint: Endpoint::Series,
        metric: Some(metric),
        band: Some(band),
        aggregated: true,
    }
}

pub const CATALOG: &[FeedDescriptor] = &[
    fixed("summary", Endpoint::Summary),
    fixed("latest", Endpoint::Latest),
    fixed("glossary", Endpoint::Glossary),
    gps("tec", "tec"),
    gps("hdop", "hdop"),
    gps("pdop", "pdop"),
    gps("vdop", "vdop"),
    gps("cn0", "cn0_mean"),
    gps("sv_used", "sv_used"),
    rf("noise24", "noise_dbm", "24"),
    rf("noise58", "noise_dbm", "58"),
    rf("scan24", "scan_p50", "24"),
    rf("scan58", "scan_p50", "58"),
    rf("busy24", "busy_ratio", "24"),
    rf("busy58", "busy_ratio", "58"),
    FeedDescriptor {
        name: "kp",
        endpoint: Endpoint::Series,
        metric: Some("kp"),
        band: None,
        aggregated: false,
    },
    fixed("track", Endpoint::Track),
    gps("temp", "t_c"),
    gps("hum", "rh_pct"),
    gps("press", "p_hpa"),
    gps("mag", "mag_norm_ut"),
];

/// A line chart render target and the feed that supplies it.
#[derive(Debug, Clone, Copy)]
pub struct ChartSpec {
    pub key: &'static str,
    pub feed: &'static str,
    pub label: &'static str,
}

pub const CHARTS: &[ChartSpec] = &[
    ChartSpec { key: "tec", feed: "tec", label: "TEC" },
    ChartSpec { key: "hdop", feed: "hdop", label: "HDOP" },
    ChartSpec { key: "pdop", feed: "pdop", label: "PDOP" },
    ChartSpec { key: "vdop", feed: "vdop", label: "VDOP" },
    ChartSpec { key: "cn0", feed: "cn0", label: "C/N0" },
    ChartSpec { key: "svused", feed: "sv_used", label: "SV used" },
    ChartSpec { key: "noise24", feed: "noise24", label: "noise dBm" },
    ChartSpec { key: "noise58", feed: "noise58", label: "noise dBm" },
    ChartSpec { key: "scan24", feed: "scan24", label: "scan p50 RSSI" },
    ChartSpec { key: "scan58", feed: "scan58", label: "scan p50 RSSI" },
    ChartSpec { key: "busy24", feed: "busy24", label: "busy ratio" },
    ChartSpec { key: "busy58", feed: "busy58", label: "busy ratio" },
    ChartSpec { key: "kp", feed: "kp", label: "Kp" },
    ChartSpec { key: "temp", feed: "temp", label: "Temperature °C" },
    ChartSpec { key: "hum", feed: "hum", label: "Humidity %" },
    ChartSpec { key: "press", feed: "press", label: "Pressure hPa" },
    ChartSpec { key: "mag", feed: "mag", label: "Magnetic field µT" },
];

/// Query parameters in send order. `None` and empty values are never sent.
pub type QueryParams = Vec<(&'static str, Option<String>)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub name: &'static str,
    pub path: &'static str,
    pub params: QueryParams,
}

impl FeedRequest {
    pub fn query_string(&self) -> String {
        encode_query(&self.params)
    }

    pub fn url(&self, base_url: &str) -> String {
        let query = self.query_string();
        let base = base_url.trim_end_matches('/');
        if query.is_empty() {
            format!("{}{}", base, self.path)
        } else {
            format!("{}{}?{}", base, self.path, query)
        }
    }
}

impl FeedDescriptor {
    pub fn request(&self, params: &ResolvedParams) -> FeedRequest {
        let minutes = Some(params.window_minutes.to_string());
        let day = params.day_param();
        let (agg, window) = if self.aggregated {
            (
                params.aggregation.map(|a| a.as_str().to_string()),
                params.bucket_width.map(|b| b.as_str().to_string()),
            )
        } else {
            (None, None)
        };
        let metric = self.metric.map(str::to_string);

        let query: QueryParams = match self.endpoint {
            Endpoint::Latest | Endpoint::Glossary => Vec::new(),
            Endpoint::Summary => vec![("day", day), ("minutes", minutes)],
            Endpoint::Track => vec![
                ("day", day),
                ("minutes", Some(params.track_minutes.to_string())),
            ],
            Endpoint::GpsSeries => vec![
                ("metric", metric),
                ("agg", agg),
                ("window", window),
                ("day", day),
                ("minutes", minutes),
            ],
            Endpoint::Series => vec![
                ("metric", metric),
                ("band", self.band.map(str::to_string)),
                ("agg", agg),
                ("window", window),
                ("day", day),
                ("minutes", minutes),
            ],
        };

        FeedRequest {
            name: self.name,
            path: self.endpoint.path(),
            params: query,
        }
    }
}

/// Serialize query parameters, omitting absent and empty values entirely.
pub fn encode_query(params: &[(&str, Option<String>)]) -> String {
    params
        .iter()
        .filter_map(|(key, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some(format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(v)
            )),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("&")
}
