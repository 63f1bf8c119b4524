//! User-facing reply text per locale.
//!
//! Errors surface only as a short diagnostic label, never as internal detail.

use sq_protocol::{ErrorKind, Resolution};
use sq_text::Locale;

use crate::config::default_sentinel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// One-line reply for a resolution.
    pub fn render(&self, resolution: &Resolution) -> String {
        match (self.locale, resolution) {
            (Locale::En, Resolution::Found(m)) => format!(
                "{} has {} units in stock (similarity {}%).",
                m.record.name, m.record.quantity, m.score
            ),
            (Locale::Pt, Resolution::Found(m)) => format!(
                "{} tem {} unidades em estoque (similaridade {}%).",
                m.record.name, m.record.quantity, m.score
            ),

            (Locale::En, Resolution::NotFound { catalog_size: 0, .. }) => {
                "No items found in the database.".into()
            }
            (Locale::Pt, Resolution::NotFound { catalog_size: 0, .. }) => {
                "Nenhum remédio encontrado no banco de dados.".into()
            }
            (Locale::En, Resolution::NotFound { .. }) => "Item not found in stock.".into(),
            (Locale::Pt, Resolution::NotFound { .. }) => {
                "Remédio não encontrado no estoque.".into()
            }

            (Locale::En, Resolution::Ambiguous { .. }) => {
                "Sorry, I am not sure which item you mean. Could you rephrase the question?".into()
            }
            (Locale::Pt, Resolution::Ambiguous { .. }) => {
                "Desculpe, não entendi o que você deseja. Pode reformular a pergunta?".into()
            }

            (Locale::En, Resolution::Error { kind }) => match kind {
                ErrorKind::ClassifierUnavailable => {
                    format!("Sorry, I could not understand the question right now ({kind}).")
                }
                ErrorKind::StoreUnavailable => {
                    format!("Sorry, the stock could not be checked right now ({kind}).")
                }
            },
            (Locale::Pt, Resolution::Error { kind }) => match kind {
                ErrorKind::ClassifierUnavailable => {
                    format!("Desculpe, não consegui entender a pergunta agora ({kind}).")
                }
                ErrorKind::StoreUnavailable => {
                    format!("Desculpe, não foi possível consultar o estoque agora ({kind}).")
                }
            },
        }
    }

    /// Line printed before each read in the interactive loop.
    pub fn prompt(&self, sentinel: &str) -> String {
        match self.locale {
            Locale::En => {
                format!("Ask about the stock of an item (or type '{sentinel}' to quit): ")
            }
            Locale::Pt => format!(
                "Pergunte sobre o estoque de algum remédio (ou digite '{sentinel}' para encerrar): "
            ),
        }
    }

    pub fn farewell(&self) -> &'static str {
        match self.locale {
            Locale::En => "Shutting down. Goodbye!",
            Locale::Pt => "Encerrando o programa. Até logo!",
        }
    }

    pub fn default_sentinel(&self) -> &'static str {
        default_sentinel(self.locale)
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}
