// ============================================================================
// Formatage des nombres pour l'affichage
// ============================================================================

/// Abrège un montant selon sa magnitude
///
/// - n ≥ 1e9 → "X.XXB"
/// - n ≥ 1e6 → "X.XXM"
/// - n ≥ 1e3 → "X.XXK"
/// - sinon   → deux décimales
///
/// Fonction totale : retourne toujours une String (NaN compris).
///
/// # Exemple
/// ```
/// use cryptodash::view::format_number;
///
/// assert_eq!(format_number(1_500_000.0), "1.50M");
/// assert_eq!(format_number(1125.0), "1.13K");
/// ```
pub fn format_number(n: f64) -> String {
    if n >= 1e9 {
        format!("{}B", fixed_2(n / 1e9))
    } else if n >= 1e6 {
        format!("{}M", fixed_2(n / 1e6))
    } else if n >= 1e3 {
        format!("{}K", fixed_2(n / 1e3))
    } else {
        fixed_2(without_negative_zero(n))
    }
}

/// Deux décimales, égalité exacte arrondie en s'éloignant de zéro
///
/// CONCEPT : `{:.2}` arrondit une égalité exacte au pair (0.125 → "0.12").
/// On lit l'écriture décimale exacte du f64 : si elle se termine par un 5
/// en troisième décimale, on pousse la valeur d'un millième avant
/// d'arrondir (0.125 → "0.13"). 1.005 vaut en réalité 1.00499... et reste
/// donc "1.00".
fn fixed_2(x: f64) -> String {
    let exact = format!("{:.64}", x.abs());
    let is_tie = exact
        .split_once('.')
        .map(|(_, frac)| frac.as_bytes()[2] == b'5' && frac.bytes().skip(3).all(|b| b == b'0'))
        .unwrap_or(false);

    if is_tie {
        format!("{:.2}", x + x.signum() * 1e-3)
    } else {
        format!("{:.2}", x)
    }
}

/// Montant en dollars abrégé (ex: "$43.25K")
pub fn format_usd(n: f64) -> String {
    format!("${}", format_number(n))
}

/// Pourcentage signé avec deux décimales
///
/// Le signe "+" est ajouté pour les valeurs ≥ 0, le "-" vient du nombre
/// lui-même : -1.23 → "-1.23%", 0 → "+0.00%".
pub fn format_signed_percent(value: f64) -> String {
    let value = without_negative_zero(value);
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{}{}%", sign, fixed_2(value))
}

/// -0.0 s'afficherait "-0.00"
fn without_negative_zero(n: f64) -> f64 {
    if n == 0.0 {
        0.0
    } else {
        n
    }
}
