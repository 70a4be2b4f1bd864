//! Identifier transformation utilities shared by normalizers and emitters
//!
//! Every target language consumes the same operation ids and parameter names,
//! so casing conversions live here rather than in a single emitter.

/// Converts a string to snake_case.
///
/// Handles camelCase, PascalCase, kebab-case and space separated input.
///
/// # Examples
/// ```
/// use clientforge::core::utils::to_snake_case;
///
/// assert_eq!(to_snake_case("findPetsByStatus"), "find_pets_by_status");
/// assert_eq!(to_snake_case("FindPetsByStatus"), "find_pets_by_status");
/// assert_eq!(to_snake_case("find-pets-by-status"), "find_pets_by_status");
/// assert_eq!(to_snake_case("get HTTP Response"), "get_http_response");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_is_lowercase = false;

    for ch in s.chars() {
        if ch.is_uppercase() {
            // Word boundary on a lower -> upper transition
            if prev_is_lowercase {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
            prev_is_lowercase = false;
        } else if ch.is_alphanumeric() {
            result.push(ch);
            prev_is_lowercase = ch.is_lowercase() || ch.is_ascii_digit();
        } else if !result.is_empty() && !result.ends_with('_') {
            // Any other separator collapses into one underscore
            result.push('_');
            prev_is_lowercase = false;
        }
    }

    result.trim_matches('_').to_string()
}

/// Converts a string to UpperCamelCase (PascalCase).
///
/// # Examples
/// ```
/// use clientforge::core::utils::to_proper_case;
///
/// assert_eq!(to_proper_case("find_pets_by_status"), "FindPetsByStatus");
/// assert_eq!(to_proper_case("getPet"), "GetPet");
/// ```
pub fn to_proper_case(s: &str) -> String {
    to_snake_case(s)
        .split('_')
        .filter(|s| !s.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

/// Converts a string to lowerCamelCase.
///
/// # Examples
/// ```
/// use clientforge::core::utils::to_camel_case;
///
/// assert_eq!(to_camel_case("find_pets_by_status"), "findPetsByStatus");
/// assert_eq!(to_camel_case("GetPet"), "getPet");
/// ```
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_proper_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Builds a bare identifier by stripping every non-alphanumeric character.
///
/// Pieces separated by stripped characters are joined camel-style, the casing
/// inside a piece is kept, and the first character is lower-cased. Returns
/// `None` when nothing usable remains.
///
/// ```
/// use clientforge::core::utils::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("getPet").as_deref(), Some("getPet"));
/// assert_eq!(sanitize_identifier("pets.list-all").as_deref(), Some("petsListAll"));
/// assert_eq!(sanitize_identifier("Get Pet By Id").as_deref(), Some("getPetById"));
/// assert_eq!(sanitize_identifier("2fa verify").as_deref(), Some("op2faVerify"));
/// assert_eq!(sanitize_identifier("--"), None);
/// ```
pub fn sanitize_identifier(raw: &str) -> Option<String> {
    let mut ident = String::new();
    for piece in raw
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|p| !p.is_empty())
    {
        let mut chars = piece.chars();
        let Some(first) = chars.next() else { continue };
        if ident.is_empty() {
            ident.push(first.to_ascii_lowercase());
        } else {
            ident.push(first.to_ascii_uppercase());
        }
        ident.push_str(chars.as_str());
    }

    if ident.is_empty() {
        return None;
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert_str(0, "op");
    }
    Some(ident)
}

/// Returns `true` when `s` is a non-empty ASCII identifier that does not
/// start with a digit.
pub fn is_bare_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("findPetsByStatus"), "find_pets_by_status");
        assert_eq!(to_snake_case("FindPetsByStatus"), "find_pets_by_status");
        assert_eq!(to_snake_case("find-pets-by-status"), "find_pets_by_status");
        assert_eq!(to_snake_case("find_pets_by_status"), "find_pets_by_status");
        assert_eq!(to_snake_case("getPetsId"), "get_pets_id");
        assert_eq!(to_snake_case("getPet2"), "get_pet2");
        assert_eq!(to_snake_case("get HTTP Response"), "get_http_response");
        assert_eq!(to_snake_case("X-API-Key"), "x_api_key");
    }

    #[test]
    fn test_to_proper_case() {
        assert_eq!(to_proper_case("find_pets_by_status"), "FindPetsByStatus");
        assert_eq!(to_proper_case("findPetsByStatus"), "FindPetsByStatus");
        assert_eq!(to_proper_case("find-pets-by-status"), "FindPetsByStatus");
        assert_eq!(to_proper_case("http_response"), "HttpResponse");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("find_pets_by_status"), "findPetsByStatus");
        assert_eq!(to_camel_case("FindPetsByStatus"), "findPetsByStatus");
        assert_eq!(to_camel_case("pet-id"), "petId");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("listPets").as_deref(), Some("listPets"));
        assert_eq!(sanitize_identifier("list_pets").as_deref(), Some("listPets"));
        assert_eq!(sanitize_identifier("  ").as_deref(), None);
        assert_eq!(sanitize_identifier("héllo wörld").as_deref(), Some("hLloWRld"));
    }

    #[test]
    fn test_is_bare_identifier() {
        assert!(is_bare_identifier("getPet"));
        assert!(is_bare_identifier("_private"));
        assert!(!is_bare_identifier("2fa"));
        assert!(!is_bare_identifier("get-pet"));
        assert!(!is_bare_identifier(""));
    }
}
