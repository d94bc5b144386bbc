// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::Sqlite;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

/// Insert a currency if its code is not present yet. Existing rows keep
/// their name and symbol.
pub async fn insert_currency<'a, E>(executor: E, code: &str, name: &str, symbol: &str) -> Result<()>
where
    E: sqlx::Executor<'a, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO currencies (code, name, symbol)
        VALUES (?, ?, ?)
        ON CONFLICT(code) DO NOTHING
        "#,
    )
    .bind(code)
    .bind(name)
    .bind(symbol)
    .execute(executor)
    .await?;

    Ok(())
}

/// List all currencies in the database, ordered by code.
pub async fn list_currencies<'a, E>(executor: E) -> Result<Vec<Currency>>
where
    E: sqlx::Executor<'a, Database = Sqlite>,
{
    let records = sqlx::query_as::<_, (String, String, String)>(
        r#"
        SELECT code, name, symbol
        FROM currencies
        ORDER BY code
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(records
        .into_iter()
        .map(|(code, name, symbol)| Currency { code, name, symbol })
        .collect())
}

pub async fn count_currencies<'a, E>(executor: E) -> Result<i64>
where
    E: sqlx::Executor<'a, Database = Sqlite>,
{
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM currencies")
        .fetch_one(executor)
        .await?;

    Ok(count)
}

/// Minimal catalog seeded when the provider cannot be reached at first start.
pub const FALLBACK_CURRENCIES: &[(&str, &str, &str)] = &[
    ("USD", "US Dollar", "$"),
    ("EUR", "Euro", "€"),
    ("GBP", "British Pound", "£"),
    ("JPY", "Japanese Yen", "¥"),
    ("AUD", "Australian Dollar", "A$"),
    ("CAD", "Canadian Dollar", "C$"),
    ("CHF", "Swiss Franc", "CHF"),
    ("CNY", "Chinese Yuan", "¥"),
    ("INR", "Indian Rupee", "₹"),
];

/// Display name and symbol for codes the catalog initializer recognizes.
/// Codes outside this table fall back to the bare code for both.
pub fn currency_display_info(code: &str) -> Option<(&'static str, &'static str)> {
    KNOWN_CURRENCIES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, name, symbol)| (*name, *symbol))
}

const KNOWN_CURRENCIES: &[(&str, &str, &str)] = &[
    ("AED", "UAE Dirham", "د.إ"),
    ("AFN", "Afghan Afghani", "؋"),
    ("ALL", "Albanian Lek", "L"),
    ("AMD", "Armenian Dram", "֏"),
    ("AOA", "Angolan Kwanza", "Kz"),
    ("ARS", "Argentine Peso", "$"),
    ("AUD", "Australian Dollar", "A$"),
    ("AZN", "Azerbaijani Manat", "₼"),
    ("BAM", "Bosnia-Herzegovina Convertible Mark", "KM"),
    ("BDT", "Bangladeshi Taka", "৳"),
    ("BGN", "Bulgarian Lev", "лв"),
    ("BHD", "Bahraini Dinar", "د.ب"),
    ("BRL", "Brazilian Real", "R$"),
    ("BWP", "Botswana Pula", "P"),
    ("BYN", "Belarusian Ruble", "Br"),
    ("CAD", "Canadian Dollar", "C$"),
    ("CHF", "Swiss Franc", "CHF"),
    ("CLP", "Chilean Peso", "$"),
    ("CNY", "Chinese Yuan", "¥"),
    ("COP", "Colombian Peso", "$"),
    ("CZK", "Czech Koruna", "Kč"),
    ("DKK", "Danish Krone", "kr"),
    ("DZD", "Algerian Dinar", "د.ج"),
    ("EGP", "Egyptian Pound", "£"),
    ("ETB", "Ethiopian Birr", "Br"),
    ("EUR", "Euro", "€"),
    ("GBP", "British Pound", "£"),
    ("GEL", "Georgian Lari", "₾"),
    ("GHS", "Ghanaian Cedi", "₵"),
    ("HKD", "Hong Kong Dollar", "HK$"),
    ("HRK", "Croatian Kuna", "kn"),
    ("HUF", "Hungarian Forint", "Ft"),
    ("IDR", "Indonesian Rupiah", "Rp"),
    ("ILS", "Israeli New Shekel", "₪"),
    ("INR", "Indian Rupee", "₹"),
    ("IQD", "Iraqi Dinar", "ع.د"),
    ("IRR", "Iranian Rial", "﷼"),
    ("ISK", "Icelandic Króna", "kr"),
    ("JOD", "Jordanian Dinar", "د.ا"),
    ("JPY", "Japanese Yen", "¥"),
    ("KES", "Kenyan Shilling", "KSh"),
    ("KGS", "Kyrgyzstani Som", "с"),
    ("KRW", "South Korean Won", "₩"),
    ("KWD", "Kuwaiti Dinar", "د.ك"),
    ("KZT", "Kazakhstani Tenge", "₸"),
    ("LBP", "Lebanese Pound", "ل.ل"),
    ("LKR", "Sri Lankan Rupee", "Rs"),
    ("LYD", "Libyan Dinar", "ل.د"),
    ("MAD", "Moroccan Dirham", "د.م."),
    ("MDL", "Moldovan Leu", "L"),
    ("MKD", "Macedonian Denar", "ден"),
    ("MNT", "Mongolian Tögrög", "₮"),
    ("MUR", "Mauritian Rupee", "₨"),
    ("MXN", "Mexican Peso", "$"),
    ("MYR", "Malaysian Ringgit", "RM"),
    ("MZN", "Mozambican Metical", "MT"),
    ("NAD", "Namibian Dollar", "N$"),
    ("NGN", "Nigerian Naira", "₦"),
    ("NOK", "Norwegian Krone", "kr"),
    ("NPR", "Nepalese Rupee", "Rs"),
    ("NZD", "New Zealand Dollar", "NZ$"),
    ("OMR", "Omani Rial", "﷼"),
    ("PEN", "Peruvian Sol", "S/"),
    ("PHP", "Philippine Peso", "₱"),
    ("PKR", "Pakistani Rupee", "₨"),
    ("PLN", "Polish Złoty", "zł"),
    ("QAR", "Qatari Riyal", "﷼"),
    ("RON", "Romanian Leu", "lei"),
    ("RSD", "Serbian Dinar", "дин"),
    ("RUB", "Russian Ruble", "₽"),
    ("RWF", "Rwandan Franc", "FRw"),
    ("SAR", "Saudi Riyal", "﷼"),
    ("SEK", "Swedish Krona", "kr"),
    ("SGD", "Singapore Dollar", "S$"),
    ("SYP", "Syrian Pound", "£"),
    ("THB", "Thai Baht", "฿"),
    ("TJS", "Tajikistani Somoni", "ЅМ"),
    ("TMT", "Turkmenistani Manat", "m"),
    ("TND", "Tunisian Dinar", "د.ت"),
    ("TRY", "Turkish Lira", "₺"),
    ("TWD", "Taiwan Dollar", "NT$"),
    ("TZS", "Tanzanian Shilling", "TSh"),
    ("UAH", "Ukrainian Hryvnia", "₴"),
    ("UGX", "Ugandan Shilling", "USh"),
    ("USD", "US Dollar", "$"),
    ("UZS", "Uzbekistani Som", "soʻm"),
    ("VND", "Vietnamese Dong", "₫"),
    ("XAF", "Central African CFA Franc", "FCFA"),
    ("XOF", "West African CFA Franc", "CFA"),
    ("YER", "Yemeni Rial", "﷼"),
    ("ZAR", "South African Rand", "R"),
    ("ZMW", "Zambian Kwacha", "ZK"),
];
