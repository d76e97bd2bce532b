use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, EngineError, OperationType, PostTransactionCmd};
use migration::MigratorTrait;
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "ledger_admin")]
#[command(about = "Admin utilities for the ledger (accounts and postings)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./ledger.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Account(Account),
    Transaction(Transaction),
}

#[derive(Args, Debug)]
struct Account {
    #[command(subcommand)]
    command: AccountCommand,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    /// Open an account for a CPF or CNPJ holder.
    Open {
        #[arg(long)]
        document: String,
    },
    Show {
        #[arg(long)]
        id: Uuid,
    },
    Balance {
        #[arg(long)]
        id: Uuid,
    },
}

#[derive(Args, Debug)]
struct Transaction {
    #[command(subcommand)]
    command: TransactionCommand,
}

#[derive(Subcommand, Debug)]
enum TransactionCommand {
    Post(PostArgs),
    /// List the postings of an account, oldest first.
    List {
        #[arg(long)]
        account: Uuid,
    },
}

#[derive(Args, Debug)]
struct PostArgs {
    #[arg(long)]
    account: Uuid,
    /// One of normal_purchase, installment_purchase, withdrawal, credit_voucher.
    #[arg(long, value_parser = parse_operation)]
    operation: OperationType,
    /// Unsigned amount in currency units, e.g. `50.25`.
    #[arg(long)]
    amount: Decimal,
    #[arg(long)]
    idempotency_key: Option<String>,
}

fn parse_operation(raw: &str) -> Result<OperationType, String> {
    OperationType::try_from(raw).map_err(|err| err.to_string())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn print_transaction(tx: &engine::Transaction) {
    println!(
        "{}  {}  {:<20}  {:>12}  {}",
        tx.id,
        tx.created_at.format("%Y-%m-%d %H:%M:%S"),
        tx.operation,
        tx.amount,
        tx.idempotency_key.as_deref().unwrap_or("-"),
    );
}

async fn run(engine: &Engine, command: Command) -> Result<(), EngineError> {
    match command {
        Command::Account(Account {
            command: AccountCommand::Open { document },
        }) => {
            let account = engine.open_account(&document).await?;
            println!("opened account: {} ({})", account.id, account.document);
        }
        Command::Account(Account {
            command: AccountCommand::Show { id },
        }) => {
            let account = engine.account(id).await?;
            println!("account:  {}", account.id);
            println!("customer: {}", account.customer_id);
            println!("document: {}", account.document);
            println!("opened:   {}", account.created_at);
        }
        Command::Account(Account {
            command: AccountCommand::Balance { id },
        }) => {
            let balance = engine.balance(id).await?;
            println!("{}", balance.balance);
        }
        Command::Transaction(Transaction {
            command: TransactionCommand::Post(args),
        }) => {
            let mut cmd = PostTransactionCmd::new(args.account, args.operation, args.amount);
            if let Some(key) = args.idempotency_key {
                cmd = cmd.idempotency_key(key);
            }
            let tx = engine.post_transaction(cmd).await?;
            print_transaction(&tx);
        }
        Command::Transaction(Transaction {
            command: TransactionCommand::List { account },
        }) => {
            engine.account(account).await?;
            for tx in engine.transactions_for_account(account).await? {
                print_transaction(&tx);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    if let Err(err) = run(&engine, cli.command).await {
        eprintln!("{err}");
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_post_with_key() {
        let cli = Cli::try_parse_from([
            "ledger_admin",
            "--database-url",
            "sqlite::memory:",
            "transaction",
            "post",
            "--account",
            "5f0c3f5e-0000-4000-8000-000000000000",
            "--operation",
            "withdrawal",
            "--amount",
            "12.50",
            "--idempotency-key",
            "K",
        ])
        .unwrap();

        let Command::Transaction(Transaction {
            command: TransactionCommand::Post(args),
        }) = cli.command
        else {
            panic!("expected transaction post");
        };
        assert_eq!(args.operation, OperationType::Withdrawal);
        assert_eq!(args.amount, Decimal::new(1250, 2));
        assert_eq!(args.idempotency_key.as_deref(), Some("K"));
    }

    #[test]
    fn rejects_unknown_operation() {
        let result = Cli::try_parse_from([
            "ledger_admin",
            "transaction",
            "post",
            "--account",
            "5f0c3f5e-0000-4000-8000-000000000000",
            "--operation",
            "refund",
            "--amount",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn open_and_post_against_memory_db() {
        let db = connect_db("sqlite::memory:").await.unwrap();
        let engine = Engine::builder().database(db).build().await.unwrap();

        let account = engine.open_account("52998224725").await.unwrap();
        let command = Command::Transaction(Transaction {
            command: TransactionCommand::Post(PostArgs {
                account: account.id,
                operation: OperationType::CreditVoucher,
                amount: Decimal::new(1000, 2),
                idempotency_key: None,
            }),
        });
        run(&engine, command).await.unwrap();

        let balance = engine.balance(account.id).await.unwrap();
        assert_eq!(balance.balance.cents(), 1000);
    }
}
