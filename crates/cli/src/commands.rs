use api_types::expense::{Category, Expense, ExpenseDraft, TransactionKind};
use chrono::{NaiveTime, Utc};
use client::{ApiClient, ClientError, FileCache, Ledger, Summary};
use uuid::Uuid;

use crate::{
    config::{CategoryArg, Command, DraftArgs, Kind},
    error::Result,
};

pub async fn run(
    command: Command,
    api: &ApiClient,
    token: &str,
    ledger: &mut Ledger<FileCache>,
) -> Result<()> {
    match command {
        Command::List => {
            refresh_or_warn(ledger, api, token).await;
            print_list(ledger.expenses());
        }
        Command::Summary => {
            refresh_or_warn(ledger, api, token).await;
            print_summary(&ledger.summary());
        }
        Command::Add(args) => {
            let created = api.create(token, &draft(args)).await?;
            println!("Added {}", line(&created));
            ledger.record_created(created)?;
        }
        Command::Update { id, draft: args } => {
            let updated = api.update(token, id, &draft(args)).await?;
            println!("Updated {}", line(&updated));
            ledger.refresh(api, token).await?;
        }
        Command::Delete { id } => {
            delete(api, token, ledger, id).await?;
        }
    }
    Ok(())
}

async fn delete(
    api: &ApiClient,
    token: &str,
    ledger: &mut Ledger<FileCache>,
    id: Uuid,
) -> Result<()> {
    let deleted = api.delete(token, id).await?;
    ledger.record_deleted(deleted.id);
    println!("Deleted {}", line(&deleted));
    Ok(())
}

async fn refresh_or_warn(ledger: &mut Ledger<FileCache>, api: &ApiClient, token: &str) {
    if let Err(err) = ledger.refresh(api, token).await {
        eprintln!("{}", stale_warning(ledger, &err));
    }
}

fn stale_warning(ledger: &Ledger<FileCache>, err: &ClientError) -> String {
    format!(
        "warning: showing cached data for {} from {} ({err})",
        ledger.user_id(),
        ledger.cache().path().display()
    )
}

fn draft(args: DraftArgs) -> ExpenseDraft {
    let date = args
        .date
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .unwrap_or_else(Utc::now);

    ExpenseDraft {
        kind: match args.kind {
            Kind::Income => TransactionKind::Income,
            Kind::Expense => TransactionKind::Expense,
        },
        title: args.title,
        amount: args.amount,
        category: category(args.category),
        date,
        notes: args.notes,
    }
}

fn category(arg: CategoryArg) -> Category {
    match arg {
        CategoryArg::Food => Category::Food,
        CategoryArg::Transport => Category::Transport,
        CategoryArg::Shopping => Category::Shopping,
        CategoryArg::Bills => Category::Bills,
        CategoryArg::Income => Category::Income,
        CategoryArg::Other => Category::Other,
    }
}

fn signed_amount(expense: &Expense) -> String {
    match expense.kind {
        TransactionKind::Income => format!("+{:.2}", expense.amount),
        TransactionKind::Expense => format!("-{:.2}", expense.amount),
    }
}

fn line(expense: &Expense) -> String {
    format!(
        "{} {} {:<24} {:>10} {:<9} {}",
        expense.id,
        expense.date.format("%Y-%m-%d"),
        expense.title,
        signed_amount(expense),
        expense.category.as_str(),
        expense.notes.as_deref().unwrap_or_default(),
    )
}

fn print_list(expenses: &[Expense]) {
    if expenses.is_empty() {
        println!("No transactions yet.");
        return;
    }
    for expense in expenses {
        println!("{}", line(expense));
    }
}

fn print_summary(summary: &Summary) {
    println!("Income:   {:>12.2}", summary.total_income);
    println!("Expenses: {:>12.2}", summary.total_expenses);
    println!("Balance:  {:>12.2}", summary.balance);

    println!();
    println!("Recent");
    if summary.recent.is_empty() {
        println!("  none");
    }
    for expense in &summary.recent {
        println!("  {}", line(expense));
    }

    println!();
    println!("By category");
    for (category, total) in &summary.category_totals {
        println!("  {:<9} {:>12.2}", category.as_str(), total);
    }
}
