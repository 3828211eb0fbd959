//! Regex patterns for requisition notice fields.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Official letter number
    pub static ref LETTER_NUMBER: Regex = Regex::new(
        r"(?i)Definitivo\s+OF[IÍ]CIO\s+N[º°o]\s*:\s*([\d./A-Z]+)"
    ).unwrap();

    // Beneficiary section
    pub static ref BENEFICIARY_NAME: Regex = Regex::new(
        r"(?i)III\s*-\s*BENEFICI[AÁ]RIO\s+Nome:[ \t]*([^\r\n]+)"
    ).unwrap();

    pub static ref BENEFICIARY_CPF: Regex = Regex::new(
        r"(?i)III\s*-\s*BENEFICI[AÁ]RIO\s+Nome:[ \t]*[^\r\n]+\s+CPF:\s*([\d.\-]+)"
    ).unwrap();

    // Gross value (Brazilian format: 650.266,04)
    pub static ref GROSS_VALUE: Regex = Regex::new(
        r"(?i)Valor\s+bruto\s+da\s+requisi[cç][aã]o:\s*R\$\s*([\d.,]+)"
    ).unwrap();

    // Calculation base date
    pub static ref BASE_DATE: Regex = Regex::new(
        r"(?i)Data\s+base\s+do\s+c[aá]lculo:\s*(\d{2}/\d{2}/\d{4})"
    ).unwrap();
}
