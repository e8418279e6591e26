// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Canonicalizes a street name so that labels coming from different data sources
/// can be matched against each other.
///
/// The name is lowercased, accented vowels and `ç` are replaced by their
/// ASCII counterparts, and surrounding whitespace is trimmed. Any other character
/// is kept as is. The function is idempotent.
pub fn normalize(name: &str) -> String {
    let folded: String = name.to_lowercase().chars().map(strip_accent).collect();
    folded.trim().to_string()
}

fn strip_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_accents_and_case() {
        assert_eq!(normalize("Rua São João"), "rua sao joao");
        assert_eq!(normalize("AVENIDA CONCEIÇÃO"), "avenida conceicao");
        assert_eq!(normalize("Praça Otávio Mangabeira"), "praca otavio mangabeira");
        assert_eq!(normalize("Rua Pôr do Sol"), "rua por do sol");
        assert_eq!(normalize("  Rua Ú  \t"), "rua u");
    }

    #[test]
    fn normalize_passes_other_characters() {
        assert_eq!(normalize("Rua 7 de Setembro, nº 12"), "rua 7 de setembro, nº 12");
        assert_eq!(normalize("Straße"), "straße");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for name in [
            "Rua São João",
            "  AVENIDA CONCEIÇÃO ",
            "Travessa Ñandú",
            "İstiklal Caddesi",
            "\u{a0}Rua\u{a0}",
            "ÀÉÎÕÜ",
        ] {
            let once = normalize(name);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", name);
        }
    }
}
