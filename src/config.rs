/// Configuration for an interactive growth session
#[derive(Clone)]
pub struct GrowConfig {
    pub seed: Option<u64>,
    pub angle: f64,
    pub max_generations: u32,
    pub cooldown: f64,
    pub auto: bool,
}

/// Configuration for one-shot stdout rendering
#[derive(Clone)]
pub struct PrintConfig {
    pub seed: Option<u64>,
    pub angle: f64,
    pub generations: u32,
}

/// Configuration for SVG export
#[derive(Clone)]
pub struct SvgConfig {
    pub seed: Option<u64>,
    pub angle: f64,
    pub generations: u32,
    pub width: f64,
    pub height: f64,
    pub output: Option<std::path::PathBuf>,
}
