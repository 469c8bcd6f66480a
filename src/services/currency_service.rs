use crate::models::{Currency, CurrencyPreview};

/// Shown when a code is not in [`CURRENCIES`].
pub const FALLBACK_SYMBOL: &str = "$";

const fn currency(code: &'static str, name: &'static str, symbol: &'static str, minor_units: u8) -> Currency {
    Currency { code, name, symbol, minor_units }
}

/// Selectable currencies: the four majors first, then alphabetical.
pub const CURRENCIES: &[Currency] = &[
    currency("USD", "United States Dollar", "$", 2),
    currency("EUR", "Euro", "€", 2),
    currency("JPY", "Japanese Yen", "¥", 0),
    currency("GBP", "British Pound", "£", 2),
    currency("AED", "UAE Dirham", "AED", 2),
    currency("ARS", "Argentine Peso", "ARS", 2),
    currency("AUD", "Australian Dollar", "A$", 2),
    currency("BGN", "Bulgarian Lev", "BGN", 2),
    currency("BRL", "Brazilian Real", "R$", 2),
    currency("CAD", "Canadian Dollar", "CA$", 2),
    currency("CHF", "Swiss Franc", "CHF", 2),
    currency("CLP", "Chilean Peso", "CLP", 0),
    currency("CNY", "Chinese Yuan", "CN¥", 2),
    currency("COP", "Colombian Peso", "COP", 2),
    currency("CZK", "Czech Koruna", "CZK", 2),
    currency("DKK", "Danish Krone", "DKK", 2),
    currency("DZD", "Algerian Dinar", "DZD", 2),
    currency("EGP", "Egyptian Pound", "EGP", 2),
    currency("ETB", "Ethiopian Birr", "ETB", 2),
    currency("GHS", "Ghanaian Cedi", "GHS", 2),
    currency("HKD", "Hong Kong Dollar", "HK$", 2),
    currency("HUF", "Hungarian Forint", "HUF", 2),
    currency("IDR", "Indonesian Rupiah", "IDR", 2),
    currency("ILS", "Israeli New Shekel", "₪", 2),
    currency("INR", "Indian Rupee", "₹", 2),
    currency("ISK", "Icelandic Króna", "ISK", 0),
    currency("KES", "Kenyan Shilling", "KES", 2),
    currency("KRW", "South Korean Won", "₩", 0),
    currency("KZT", "Kazakhstani Tenge", "KZT", 2),
    currency("MAD", "Moroccan Dirham", "MAD", 2),
    currency("MXN", "Mexican Peso", "MX$", 2),
    currency("MYR", "Malaysian Ringgit", "MYR", 2),
    currency("NGN", "Nigerian Naira", "NGN", 2),
    currency("NOK", "Norwegian Krone", "NOK", 2),
    currency("NZD", "New Zealand Dollar", "NZ$", 2),
    currency("PEN", "Peruvian Sol", "PEN", 2),
    currency("PHP", "Philippine Peso", "₱", 2),
    currency("PKR", "Pakistani Rupee", "PKR", 2),
    currency("PLN", "Polish Złoty", "PLN", 2),
    currency("RON", "Romanian Leu", "RON", 2),
    currency("RUB", "Russian Ruble", "RUB", 2),
    currency("SAR", "Saudi Riyal", "SAR", 2),
    currency("SEK", "Swedish Krona", "SEK", 2),
    currency("SGD", "Singapore Dollar", "SGD", 2),
    currency("THB", "Thai Baht", "THB", 2),
    currency("TRY", "Turkish Lira", "TRY", 2),
    currency("TZS", "Tanzanian Shilling", "TZS", 2),
    currency("TWD", "New Taiwan Dollar", "NT$", 2),
    currency("UAH", "Ukrainian Hryvnia", "UAH", 2),
    currency("UGX", "Ugandan Shilling", "UGX", 0),
    currency("XAF", "CFA Franc BEAC", "FCFA", 0),
    currency("XOF", "CFA Franc BCEAO", "F\u{202f}CFA", 0),
    currency("ZAR", "South African Rand", "ZAR", 2),
    currency("ZMW", "Zambian Kwacha", "ZMW", 2),
];

pub fn find(code: &str) -> Option<&'static Currency> {
    let code = code.trim();
    CURRENCIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

pub fn is_supported(code: &str) -> bool {
    find(code).is_some()
}

pub fn symbol(code: &str) -> &'static str {
    find(code).map(|c| c.symbol).unwrap_or(FALLBACK_SYMBOL)
}

/// Formats `value` with the currency's own number of fraction digits.
pub fn format(value: f64, code: &str) -> String {
    let digits = find(code).map(|c| c.minor_units as usize).unwrap_or(2);
    format_with_digits(value, code, digits, digits)
}

/// en-US currency rendering: `$1,234.50`, `-€3.00`, `CHF 12.00`.
///
/// Keeps at least `min_fraction` and at most `max_fraction` digits after the
/// decimal point; halves round away from zero.
pub fn format_with_digits(value: f64, code: &str, min_fraction: usize, max_fraction: usize) -> String {
    render(value, symbol(code), min_fraction, max_fraction.max(min_fraction))
}

/// Same as [`format`] but never emits a symbol outside ASCII; the built-in
/// PDF fonts cannot draw them, so the ISO code is used instead.
pub fn format_ascii(value: f64, code: &str) -> String {
    let digits = find(code).map(|c| c.minor_units as usize).unwrap_or(2);
    let sym = symbol(code);
    let sym = if sym.is_ascii() {
        sym.to_string()
    } else {
        find(code).map(|c| c.code.to_string()).unwrap_or_else(|| FALLBACK_SYMBOL.to_string())
    };
    render(value, &sym, digits, digits)
}

pub fn preview(code: &str) -> CurrencyPreview {
    CurrencyPreview {
        code: code.trim().to_ascii_uppercase(),
        supported: is_supported(code),
        symbol: symbol(code).to_string(),
        example: format(1234.5, code),
    }
}

fn render(value: f64, symbol: &str, min_fraction: usize, max_fraction: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let scale = 10f64.powi(max_fraction as i32);
    let magnitude = (value.abs() * scale).round() / scale;

    let fixed = format!("{:.*}", max_fraction, magnitude);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut fraction = frac_part.to_string();
    while fraction.len() > min_fraction && fraction.ends_with('0') {
        fraction.pop();
    }

    let mut number = group_thousands(int_part);
    if !fraction.is_empty() {
        number.push('.');
        number.push_str(&fraction);
    }

    let sign = if value < 0.0 && magnitude > 0.0 { "-" } else { "" };
    let separator = if symbol.chars().last().is_some_and(char::is_alphabetic) {
        " "
    } else {
        ""
    };

    format!("{sign}{symbol}{separator}{number}")
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
