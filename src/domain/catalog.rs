//! Built-in universe table.
//!
//! Every selectable universe is one `UniverseDef` row: its benchmark, where
//! its constituents come from and how its labels are displayed. The resolver
//! in [`crate::domain::universe`] reads only this table.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniverseKind {
    IndexBasket,
    SectorBasket,
    SubSectorBasket,
    CurrencyPairs,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constituent {
    pub symbol: &'static str,
    pub label: &'static str,
}

const fn c(symbol: &'static str, label: &'static str) -> Constituent {
    Constituent { symbol, label }
}

#[derive(Debug, Clone, Copy)]
pub enum Members {
    Fixed(&'static [Constituent]),
    /// Keyed by sub-sector name.
    BySector(&'static [(&'static str, &'static [Constituent])]),
    /// Supplied by the user on each pass.
    Custom,
}

#[derive(Debug, Clone, Copy)]
pub struct UniverseDef {
    pub name: &'static str,
    pub kind: UniverseKind,
    pub benchmark: &'static str,
    /// Alternative benchmarks the user may pick. Empty means fixed.
    pub benchmark_choices: &'static [&'static str],
    pub members: Members,
    /// Use the bare symbol without its venue suffix when no label exists.
    pub strip_suffix: bool,
}

impl UniverseDef {
    pub fn sector_keys(&self) -> Vec<&'static str> {
        match self.members {
            Members::BySector(sectors) => sectors.iter().map(|(key, _)| *key).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub key: &'static str,
    pub tickers: &'static [&'static str],
}

/// Custom portfolios accept at most this many tickers.
pub const MAX_CUSTOM_TICKERS: usize = 15;

/// Tickers known to be unreliable at the vendor and the listing used in
/// their place.
pub const PROXIES: &[(&str, &str)] = &[("^HSI", "2800.HK"), ("^HSCE", "2828.HK")];

pub fn proxy_for(symbol: &str) -> Option<&'static str> {
    PROXIES
        .iter()
        .find(|(original, _)| *original == symbol)
        .map(|(_, proxy)| *proxy)
}

const WORLD_INDICES: &[Constituent] = &[
    c("^GSPC", "S&P 500"),
    c("^NDX", "Nasdaq 100"),
    c("^DJI", "Dow Jones"),
    c("^RUT", "Russell 2000"),
    c("^FTSE", "FTSE 100"),
    c("^GDAXI", "DAX"),
    c("^FCHI", "CAC 40"),
    c("^N225", "Nikkei 225"),
    c("^HSI", "恒生指數"),
    c("^HSCE", "國企指數"),
    c("000001.SS", "上證指數"),
    c("^AXJO", "ASX 200"),
    c("^BSESN", "Sensex"),
    c("^KS11", "KOSPI"),
];

const US_SECTORS: &[Constituent] = &[
    c("XLB", "Materials"),
    c("XLC", "Communication"),
    c("XLE", "Energy"),
    c("XLF", "Financials"),
    c("XLI", "Industrials"),
    c("XLK", "Technology"),
    c("XLP", "Staples"),
    c("XLRE", "Real Estate"),
    c("XLU", "Utilities"),
    c("XLV", "Health Care"),
    c("XLY", "Discretionary"),
];

const HK_TECHNOLOGY: &[Constituent] = &[
    c("0700.HK", "騰訊控股"),
    c("9988.HK", "阿里巴巴"),
    c("3690.HK", "美團"),
    c("1810.HK", "小米集團"),
    c("9618.HK", "京東集團"),
    c("9999.HK", "網易"),
    c("9888.HK", "百度集團"),
    c("0981.HK", "中芯國際"),
];

const HK_FINANCIALS: &[Constituent] = &[
    c("0005.HK", "滙豐控股"),
    c("1299.HK", "友邦保險"),
    c("0939.HK", "建設銀行"),
    c("1398.HK", "工商銀行"),
    c("3988.HK", "中國銀行"),
    c("0388.HK", "香港交易所"),
    c("2318.HK", "中國平安"),
    c("0011.HK", "恒生銀行"),
];

const HK_PROPERTIES: &[Constituent] = &[
    c("0016.HK", "新鴻基地產"),
    c("1109.HK", "華潤置地"),
    c("0688.HK", "中國海外發展"),
    c("1113.HK", "長實集團"),
    c("0823.HK", "領展房產基金"),
    c("0012.HK", "恒基地產"),
    c("0101.HK", ""),
];

const HK_ENERGY_UTILITIES: &[Constituent] = &[
    c("0002.HK", "中電控股"),
    c("0003.HK", "香港中華煤氣"),
    c("0006.HK", "電能實業"),
    c("0857.HK", "中國石油"),
    c("0883.HK", "中國海洋石油"),
    c("0386.HK", "中國石化"),
];

const HK_CONSUMER: &[Constituent] = &[
    c("2020.HK", "安踏體育"),
    c("0291.HK", "華潤啤酒"),
    c("2319.HK", "蒙牛乳業"),
    c("9633.HK", "農夫山泉"),
    c("0027.HK", "銀河娛樂"),
    c("1928.HK", "金沙中國"),
    c("0066.HK", ""),
];

const HK_SECTORS: &[(&str, &[Constituent])] = &[
    ("Technology", HK_TECHNOLOGY),
    ("Financials", HK_FINANCIALS),
    ("Properties", HK_PROPERTIES),
    ("Energy & Utilities", HK_ENERGY_UTILITIES),
    ("Consumer", HK_CONSUMER),
];

const FX_PAIRS: &[Constituent] = &[
    c("EURUSD=X", "EUR/USD"),
    c("GBPUSD=X", "GBP/USD"),
    c("AUDUSD=X", "AUD/USD"),
    c("NZDUSD=X", "NZD/USD"),
    c("JPY=X", "USD/JPY"),
    c("CNY=X", "USD/CNY"),
    c("CAD=X", "USD/CAD"),
    c("CHF=X", "USD/CHF"),
    c("HKD=X", "USD/HKD"),
];

pub const CUSTOM_BENCHMARKS: &[&str] = &["ACWI", "^GSPC", "^HSI"];

pub const UNIVERSES: &[UniverseDef] = &[
    UniverseDef {
        name: "World Indices",
        kind: UniverseKind::IndexBasket,
        benchmark: "ACWI",
        benchmark_choices: &[],
        members: Members::Fixed(WORLD_INDICES),
        strip_suffix: false,
    },
    UniverseDef {
        name: "US Sectors",
        kind: UniverseKind::SectorBasket,
        benchmark: "^GSPC",
        benchmark_choices: &[],
        members: Members::Fixed(US_SECTORS),
        strip_suffix: false,
    },
    UniverseDef {
        name: "HK Sectors",
        kind: UniverseKind::SubSectorBasket,
        benchmark: "^HSI",
        benchmark_choices: &[],
        members: Members::BySector(HK_SECTORS),
        strip_suffix: true,
    },
    UniverseDef {
        name: "FX",
        kind: UniverseKind::CurrencyPairs,
        benchmark: "DX-Y.NYB",
        benchmark_choices: &[],
        members: Members::Fixed(FX_PAIRS),
        strip_suffix: false,
    },
    UniverseDef {
        name: "Custom",
        kind: UniverseKind::Custom,
        benchmark: "^GSPC",
        benchmark_choices: CUSTOM_BENCHMARKS,
        members: Members::Custom,
        strip_suffix: true,
    },
];

pub const PRESETS: &[Preset] = &[
    Preset {
        key: "US",
        tickers: &[
            "AAPL", "MSFT", "NVDA", "AMZN", "GOOGL", "META", "TSLA", "AVGO", "JPM", "LLY", "V",
            "XOM", "UNH", "COST", "NFLX",
        ],
    },
    Preset {
        key: "HK",
        tickers: &[
            "0700.HK", "9988.HK", "3690.HK", "1810.HK", "0005.HK", "1299.HK", "0939.HK",
            "0388.HK", "2318.HK", "0016.HK", "0883.HK", "0857.HK", "2020.HK", "0027.HK",
            "9618.HK",
        ],
    },
];

pub fn find_universe(name: &str) -> Option<&'static UniverseDef> {
    UNIVERSES
        .iter()
        .find(|u| u.name.eq_ignore_ascii_case(name.trim()))
}

pub fn find_preset(key: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.key.eq_ignore_ascii_case(key.trim()))
}
