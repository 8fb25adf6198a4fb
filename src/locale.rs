use std::fmt;
use chrono::Weekday;
use log::debug;

/// Weekday abbreviations, Monday first, in the order given by Locale::ALL
const WEEKDAYS: [[&str; 7]; 4] = [
    ["Dl", "Dt", "Dc", "Dj", "Dv", "Ds", "Dg"],
    ["Lun", "Mar", "Mié", "Jue", "Vie", "Sáb", "Dom"],
    ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
    ["Lun", "Mar", "Mer", "Jeu", "Ven", "Sam", "Dim"],
];

/// Report captions for one locale
pub struct Captions {
    pub title: &'static str,
    pub max: &'static str,
    pub min: &'static str,
    pub humidity: &'static str,
    pub wind: &'static str,
    pub precipitation: &'static str,
    pub uv: &'static str,
    pub hour: &'static str,
    pub temperature: &'static str,
}

const CAPTIONS: [Captions; 4] = [
    Captions {
        title: "Previsió meteorològica",
        max: "Màx",
        min: "Mín",
        humidity: "Humitat",
        wind: "Vent",
        precipitation: "Precipitació",
        uv: "Índex UV",
        hour: "Hora",
        temperature: "Temp",
    },
    Captions {
        title: "Previsión meteorológica",
        max: "Máx",
        min: "Mín",
        humidity: "Humedad",
        wind: "Viento",
        precipitation: "Precipitación",
        uv: "Índice UV",
        hour: "Hora",
        temperature: "Temp",
    },
    Captions {
        title: "Weather forecast",
        max: "Max",
        min: "Min",
        humidity: "Humidity",
        wind: "Wind",
        precipitation: "Precipitation",
        uv: "UV index",
        hour: "Hour",
        temperature: "Temp",
    },
    Captions {
        title: "Prévisions météo",
        max: "Max",
        min: "Min",
        humidity: "Humidité",
        wind: "Vent",
        precipitation: "Précipitations",
        uv: "Indice UV",
        hour: "Heure",
        temperature: "Temp",
    },
];

/// The fixed set of report locales, Catalan being the primary one
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Catalan,
    Spanish,
    English,
    French,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Locale {
    pub const ALL: [Locale; 4] = [Locale::Catalan, Locale::Spanish, Locale::English, Locale::French];

    /// Returns the locale for a language code, unknown codes fall back to the primary locale
    ///
    /// # Arguments
    ///
    /// * 'code' - language code such as "ca" or "en"
    pub fn from_code(code: &str) -> Locale {
        match code.trim().to_lowercase().as_str() {
            "ca" => Locale::Catalan,
            "es" => Locale::Spanish,
            "en" => Locale::English,
            "fr" => Locale::French,
            other => {
                debug!("unknown locale '{}', falling back to {}", other, Locale::default());
                Locale::default()
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Catalan => "ca",
            Locale::Spanish => "es",
            Locale::English => "en",
            Locale::French  => "fr",
        }
    }

    fn index(&self) -> usize {
        match self {
            Locale::Catalan => 0,
            Locale::Spanish => 1,
            Locale::English => 2,
            Locale::French  => 3,
        }
    }

    pub fn captions(&self) -> &'static Captions {
        &CAPTIONS[self.index()]
    }
}

/// Returns the short weekday label for the given locale
///
/// # Arguments
///
/// * 'weekday' - the weekday, Monday has index 0
/// * 'locale' - the locale to label in
pub fn label(weekday: Weekday, locale: Locale) -> &'static str {
    WEEKDAYS[locale.index()][weekday.num_days_from_monday() as usize]
}

/// Returns the weekday label in all four locales, ordered as Locale::ALL
///
/// # Arguments
///
/// * 'weekday' - the weekday to label
pub fn weekday_labels(weekday: Weekday) -> [&'static str; 4] {
    Locale::ALL.map(|l| label(weekday, l))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monday_is_index_zero() {
        assert_eq!(label(Weekday::Mon, Locale::Catalan), "Dl");
        assert_eq!(label(Weekday::Mon, Locale::English), "Mon");
        assert_eq!(label(Weekday::Sun, Locale::French), "Dim");
        assert_eq!(label(Weekday::Sat, Locale::Spanish), "Sáb");
    }

    #[test]
    fn test_unknown_locale_falls_back_to_primary() {
        assert_eq!(Locale::from_code("de"), Locale::Catalan);
        assert_eq!(Locale::from_code(""), Locale::Catalan);
        assert_eq!(Locale::from_code(" EN "), Locale::English);
    }

    #[test]
    fn test_weekday_labels_follow_locale_order() {
        assert_eq!(weekday_labels(Weekday::Wed), ["Dc", "Mié", "Wed", "Mer"]);
    }
}
