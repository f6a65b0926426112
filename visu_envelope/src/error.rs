use thiserror::Error;
use std::path::PathBuf;

#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("Erreur de décodage du fichier : {0}")]
    Decode(String),
    #[error("Audio invalide : {0}")]
    InvalidAudio(String),
    #[error("Erreur de rendu du graphique : {0}")]
    Render(String),
    #[error("Erreur de lecture de l'image : {0}")]
    Image(#[from] image::ImageError),
    #[error(
        "Fenêtre de scan [{x_start}, {x_end}) x [{y_start}, {y_end}) hors de l'image {width}x{height}"
    )]
    ScanWindowOutOfBounds {
        x_start: u32,
        x_end: u32,
        y_start: u32,
        y_end: u32,
        width: u32,
        height: u32,
    },
    #[error("Aucun pixel de courbe dans la fenêtre de scan")]
    SilentScan,
    #[error("Erreur de sérialisation : {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Erreur d'entrée/sortie : {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum PulseError {
    #[error("Fichier de propriétés {path:?} illisible : {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Propriétés invalides : {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("Propriété invalide `{field}` : {reason}")]
    InvalidProperty { field: &'static str, reason: String },
    #[error("Timecode invalide : {0:?}")]
    InvalidTime(String),
    #[error("Lecture des timecodes : {0}")]
    Document(#[from] EnvelopeError),
    #[error("Écriture de l'image {path:?} : {reason}")]
    FrameWrite { path: PathBuf, reason: String },
    #[error("Erreur d'entrée/sortie : {0}")]
    Io(#[from] std::io::Error),
}
