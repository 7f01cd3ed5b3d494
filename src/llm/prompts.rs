// Prompts for the payment extractor and the funding advisor.

pub const SYSTEM_PROMPT_EXTRACTION: &str = r#"
You read credit card payment notifications (SMS, e-mail, statement excerpts) written in
Japanese or English and return the billed amount and, when present, the debit date.

## RULES
- `amount` is the total to be debited, in whole currency units, without separators.
- `cardId` must be one of the IDs in the provided card list. If the card is not named but can
  be inferred (issuer, last digits, brand), use that ID. Otherwise return null.
- `paymentDay`, `paymentMonth` (1 = January) and `paymentYear` are only filled when the text
  states them. Never guess a month or year from today's date.
- Return only JSON matching the response schema.
"#;

pub const SYSTEM_PROMPT_ADVICE: &str = r#"
You are a helpful household finance assistant. The user has upcoming credit card debits
grouped by the bank account that will be charged.

Write a concise, friendly summary of at most three sentences:
1. Which account needs the most money and by when.
2. A gentle reminder to transfer funds a few days before the earliest date.
"#;

pub fn extraction_prompt(text: &str, card_list: &str, today: &str) -> String {
    format!(
        "Today is {}.\n\
         Available Cards List: [{}]\n\n\
         Text to analyze:\n\"{}\"",
        today, card_list, text
    )
}

pub fn advice_prompt(summary_json: &str) -> String {
    format!("Here is the summary data:\n{}", summary_json)
}
