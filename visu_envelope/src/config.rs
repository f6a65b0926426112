use clap::ValueEnum;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct EnvelopeConfig {
    pub file_path: PathBuf,
    pub image_path: PathBuf,
    pub output_path: PathBuf,
    /// Unités de temps par seconde d'audio (images/s du rendu consommateur)
    pub time_scale: f64,
    pub render: RenderConfig,
    pub curve: CurveConfig,
    pub average_mode: AverageMode,
    pub time_format: TimeFormat,
}

impl EnvelopeConfig {
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            image_path: PathBuf::from("foo.png"),
            output_path: PathBuf::from("data.json"),
            time_scale: 30.0,
            render: RenderConfig::default(),
            curve: CurveConfig::default(),
            average_mode: AverageMode::ColumnBudget,
            time_format: TimeFormat::Text,
        }
    }

    /// Fenêtre de scan dérivée de la géométrie du rendu
    pub fn scan_window(&self) -> ScanWindow {
        self.render.scan_window()
    }
}

/// Rectangle en pixels, bornes gauche/haut incluses, droite/bas exclues
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PixelRect {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

/// Géométrie du graphique, partagée par le renderer et le scanner
#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Zone des axes (cadre noir)
    pub plot_area: PixelRect,
    /// Retrait horizontal et vertical de la fenêtre de scan dans la zone des axes
    pub scan_inset: (u32, u32),
    /// Marge relative des données autour de la courbe
    pub data_margin: f32,
    pub line_color: [u8; 3],
    pub line_width: f32,
    pub background: [u8; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        // 800x600, premier sous-graphe d'une grille 2x1
        Self {
            width: 800,
            height: 600,
            plot_area: PixelRect { left: 100, top: 72, right: 720, bottom: 282 },
            scan_inset: (10, 5),
            data_margin: 0.05,
            line_color: [0x1f, 0x77, 0xb4],
            line_width: 1.0,
            background: [255, 255, 255],
        }
    }
}

impl RenderConfig {
    pub fn scan_window(&self) -> ScanWindow {
        let (dx, dy) = self.scan_inset;
        ScanWindow {
            x_start: self.plot_area.left + dx,
            x_end: self.plot_area.right.saturating_sub(dx),
            y_start: self.plot_area.top + dy,
            y_end: self.plot_area.bottom.saturating_sub(dy),
        }
    }
}

/// Fenêtre de pixels parcourue par le scanner, bornes de fin exclues
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScanWindow {
    pub x_start: u32,
    pub x_end: u32,
    pub y_start: u32,
    pub y_end: u32,
}

impl ScanWindow {
    pub fn width(&self) -> u32 {
        self.x_end.saturating_sub(self.x_start)
    }
}

impl Default for ScanWindow {
    fn default() -> Self {
        RenderConfig::default().scan_window()
    }
}

/// Exposants de la courbe à deux régimes
#[derive(Copy, Clone, Debug)]
pub struct CurveConfig {
    pub above_average: f64,
    pub at_or_below_average: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self { above_average: 0.6, at_or_below_average: 1.4 }
    }
}

/// Diviseur utilisé pour la moyenne des amplitudes
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum AverageMode {
    /// durée x time_scale (par défaut)
    ColumnBudget,
    /// nombre d'entrées réellement mesurées
    EntryCount,
}

/// Représentation du champ `time` dans le document JSON
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TimeFormat {
    Text,
    Number,
}
