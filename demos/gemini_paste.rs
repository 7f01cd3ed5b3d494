use card_cycle_planner::llm::{GeminiAdvisor, GeminiClient, GeminiPaymentExtractor};
use card_cycle_planner::*;
use dotenv::dotenv;
use std::error::Error;

const NOTICE: &str = "【三井住友カード】ご請求額確定のお知らせ。今回のお支払金額は 31,050円 です。";

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn Error>> {
    dotenv().ok();
    let config = PlannerConfig::from_json_file(std::path::Path::new("planner.json"))?;
    let api_key = config
        .api_key()
        .ok_or_else(|| format!("{} must be set", config.api_key_env))?;

    let client = GeminiClient::new(api_key);
    let extractor = GeminiPaymentExtractor::new(client.clone(), config.gemini_model.clone());
    let advisor = GeminiAdvisor::new(client, config.gemini_model.clone());

    let mut session = PlannerSession::open(JsonFileStorage::new(&config.data_dir)?)?;
    if session.cards().is_empty() {
        session.add_card(
            &CardDraft::new()
                .name("Family (SMBC)")
                .bank_name("Sumitomo")
                .closing_day(15)
                .payment_day(10),
        )?;
    }

    let today = today();
    match session.extract_payment(&extractor, NOTICE, today).await {
        Ok(draft) => {
            println!("📋 Parsed draft: {:?}", draft);
            if draft.is_complete() {
                let payment = session.add_payment(&draft)?;
                println!("💾 Saved payment {}", payment.id);
            } else {
                println!("⚠️  Missing {:?}, please enter manually.", draft.missing_fields());
            }
        }
        Err(e) => println!("❌ Could not read the notice ({}). Please enter it manually.", e),
    }

    let summaries = session.summaries(today, config.window);
    let advice = session.request_advice(&advisor, &summaries).await?;
    println!("\n💡 {}", advice);

    session.close()?;
    Ok(())
}
