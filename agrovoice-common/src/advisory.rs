//! Disease advisory lookup table
//!
//! Static, immutable mapping from disease label to per-language remediation
//! guidance. Loaded into the binary at compile time; nothing here changes
//! at runtime. Unrecognized labels fall back to a fixed "not recognized"
//! message in the requested language.

use crate::lang::Language;

/// Disease labels the advisory table covers, matching the class names of
/// the exported classification model.
pub const KNOWN_DISEASES: [&str; 4] = ["Black Rot", "Esca", "Leaf Blight", "Healthy"];

/// Look up the advisory text for a disease label in the given language.
///
/// Exact-match on the label; anything else (including casing differences)
/// returns the "not recognized" message.
pub fn advisory_for(disease: &str, lang: Language) -> &'static str {
    match disease {
        "Black Rot" => match lang {
            Language::En => "Black Rot detected. Use Mancozeb spray and prune infected leaves.",
            Language::Hi => {
                "ब्लैक रॉट का पता चला है। मेन्कोज़ेब स्प्रे का उपयोग करें और संक्रमित पत्तियों की छंटाई करें।"
            }
            Language::Mr => {
                "काळी कुज आढळली. मॅन्कोझेब स्प्रे वापरा आणि संक्रमित पाने छाटून टाका."
            }
        },
        "Esca" => match lang {
            Language::En => "Esca detected. Remove infected vines and apply proper fungicide.",
            Language::Hi => {
                "एस्का का पता चला। संक्रमित बेलों को हटा दें और उचित कवकनाशी का प्रयोग करें।"
            }
            Language::Mr => "एस्का आढळला. संक्रमित वेली काढून टाका आणि योग्य बुरशीनाशक वापरा.",
        },
        "Leaf Blight" => match lang {
            Language::En => {
                "Leaf Blight detected. Apply copper-based fungicides and ensure proper drainage."
            }
            Language::Hi => {
                "पत्ती झुलसा रोग का पता चला है। कॉपर-आधारित कवकनाशी का प्रयोग करें तथा उचित जल निकासी सुनिश्चित करें।"
            }
            Language::Mr => {
                "पानांवर करपा आढळला. तांबे-आधारित बुरशीनाशके वापरा आणि योग्य निचरा सुनिश्चित करा."
            }
        },
        "Healthy" => match lang {
            Language::En => "The leaf is healthy. No action needed.",
            Language::Hi => "पत्ता स्वस्थ है। कोई कार्रवाई की जरूरत नहीं है।",
            Language::Mr => "पान निरोगी आहे. काही करण्याची गरज नाही.",
        },
        _ => not_recognized(lang),
    }
}

/// Fixed fallback message for labels outside the advisory table
pub fn not_recognized(lang: Language) -> &'static str {
    match lang {
        Language::En => "Disease not recognized.",
        Language::Hi => "रोग की पहचान नहीं हुई।",
        Language::Mr => "रोग ओळखता आला नाही.",
    }
}
