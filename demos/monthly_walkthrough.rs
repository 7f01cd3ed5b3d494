use card_cycle_planner::*;
use chrono::NaiveDate;
use std::error::Error;

fn main() -> std::result::Result<(), Box<dyn Error>> {
    let dir = std::env::temp_dir().join("card-cycle-planner-demo");
    let mut session = PlannerSession::open(JsonFileStorage::new(&dir)?)?;

    if session.cards().is_empty() {
        let main = session.add_card(
            &CardDraft::new()
                .name("Main (Rakuten)")
                .bank_name("Rakuten Bank")
                .closing_day(27)
                .payment_day(27),
        )?;
        let family = session.add_card(
            &CardDraft::new()
                .name("Family (JCB)")
                .bank_name("Sumitomo")
                .closing_day(15)
                .payment_day(99)
                .owner("wife")
                .payment_source_owner("wife"),
        )?;
        session.add_payment(&PaymentDraft::new().card_id(&main.id).amount(82_400).target(2024, 1))?;
        session.add_payment(&PaymentDraft::new().card_id(&family.id).amount(31_050).target(2024, 1))?;
        session.add_payment(&PaymentDraft::new().card_id(&family.id).amount(18_700).target(2024, 2))?;
    }

    let reference = NaiveDate::from_ymd_opt(2024, 2, 1).ok_or("invalid date")?;
    let month_key = YearMonth::from_date(reference).key();
    let summaries = session.summaries(reference, AggregationWindow::TwoMonth);

    println!("📅 Funding plan from {}", month_key);
    for summary in &summaries {
        let ready = if session.is_ready(&summary.id, &month_key) { "✅" } else { "⏳" };
        println!(
            "  {} {:<24} {:>10}  by {}",
            ready,
            summary.label(),
            summary.total_amount,
            summary.earliest_payment_date
        );
    }
    println!("  Total: {}", total_outflow(&summaries));

    for (owner, amount) in owner_totals(&summaries, session.cards()) {
        println!("  {}: {}", owner, amount);
    }

    if let Some(first) = summaries.first() {
        session.toggle_readiness(&first.id, &month_key)?;
        println!("Marked {} as funded for {}", first.label(), month_key);
    }

    session.close()?;
    println!("Data stored in {}", dir.display());
    Ok(())
}
