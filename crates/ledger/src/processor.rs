//! Transaction processor - transfer, deposit, bill payment
//!
//! The only component that mutates balances. Every operation follows the
//! same shape: validate the amount before touching storage, take the
//! per-account lock, read state, apply business rules, then commit the
//! balance write and the transaction append (and the bill flip, for
//! payments) as one sqlx transaction. An error anywhere drops the
//! transaction and rolls everything back.

use crate::error::{LedgerError, LedgerResult};
use crate::services::{
    BillPaymentReceipt, DepositReceipt, ServiceContext, TransferReceipt,
};
use minibank_core::{Account, AccountType, Bill, Transaction};
use minibank_persistence::{AccountRepo, BillRepo, TransactionRepo, TransactionRow};
use rust_decimal::Decimal;
use tracing::{info, warn};

/// Ledger & transaction processor
pub struct TransactionProcessor<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TransactionProcessor<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Move money out of an account.
    ///
    /// By default only the source is debited. With `credit_destination`
    /// enabled and a destination given, the destination is credited in the
    /// same atomic unit and a matching +amount row is appended for it.
    pub async fn transfer(
        &self,
        user_id: &str,
        from_account_id: &str,
        to_account_id: Option<&str>,
        amount: Decimal,
        description: &str,
    ) -> LedgerResult<TransferReceipt> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount("Transfer", amount));
        }

        let credit_to = match to_account_id {
            Some(to) if self.ctx.config().credit_destination => {
                if to == from_account_id {
                    return Err(LedgerError::InvalidAmount(
                        "Transfer destination matches the source account".to_string(),
                    ));
                }
                Some(to)
            }
            _ => None,
        };

        let wait = self.ctx.config().lock_wait;
        let _guards = match credit_to {
            Some(to) => {
                self.ctx
                    .locks()
                    .acquire_pair(from_account_id, to, wait)
                    .await?
            }
            None => vec![self.ctx.locks().acquire(from_account_id, wait).await?],
        };

        let source = self.load_account(from_account_id).await?;
        self.check_frozen(&source)?;
        if source.balance < amount {
            warn!(account = %source.id, %amount, available = %source.balance, "transfer rejected");
            return Err(LedgerError::insufficient_funds(amount, source.balance));
        }
        let new_balance = source.balance - amount;

        // Destination is validated before any write happens
        let destination = match credit_to {
            Some(to) => {
                let dest = self.load_account(to).await?;
                self.check_frozen(&dest)?;
                Some(dest)
            }
            None => None,
        };

        let debit = Transaction::debit(user_id, &source.id, amount, description);

        let mut tx = self.ctx.pool().begin().await?;
        AccountRepo::set_balance(&mut *tx, &source.id, new_balance).await?;
        TransactionRepo::insert(&mut *tx, &TransactionRow::from(&debit)).await?;
        if let Some(dest) = destination {
            let credit = Transaction::credit(user_id, &dest.id, amount, description);
            AccountRepo::set_balance(&mut *tx, &dest.id, dest.balance + amount).await?;
            TransactionRepo::insert(&mut *tx, &TransactionRow::from(&credit)).await?;
        }
        tx.commit().await?;

        info!(account = %source.id, %amount, balance = %new_balance, "transfer committed");
        Ok(TransferReceipt {
            transaction_id: debit.id,
            new_balance,
        })
    }

    /// Credit the caller's account of the requested type.
    ///
    /// Unknown types map to checking; a missing stored balance reads as
    /// zero.
    pub async fn deposit(
        &self,
        user_id: &str,
        account_type: &str,
        amount: Decimal,
    ) -> LedgerResult<DepositReceipt> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount("Deposit", amount));
        }

        let mapped = AccountType::from_request(account_type);
        let account_id = AccountRepo::get_by_user_and_type(self.ctx.pool(), user_id, mapped)
            .await?
            .id;

        let _guard = self
            .ctx
            .locks()
            .acquire(&account_id, self.ctx.config().lock_wait)
            .await?;

        // Re-read under the lock; the pre-lock row may be stale
        let account = self.load_account(&account_id).await?;
        self.check_frozen(&account)?;
        let new_balance = account.balance + amount;

        let record =
            Transaction::deposit(user_id, &account.id, amount, &format!("Deposit ৳{amount}"));

        let mut tx = self.ctx.pool().begin().await?;
        AccountRepo::set_balance(&mut *tx, &account.id, new_balance).await?;
        TransactionRepo::insert(&mut *tx, &TransactionRow::from(&record)).await?;
        tx.commit().await?;

        info!(account = %account.id, %amount, balance = %new_balance, "deposit committed");
        Ok(DepositReceipt {
            transaction_id: record.id,
            account_id: account.id,
            new_balance,
        })
    }

    /// Pay a bill from an account.
    ///
    /// Debits the account, flips the bill to paid and appends the
    /// transaction in one atomic unit. A bill that is already paid is
    /// rejected; it is never debited twice.
    pub async fn pay_bill(
        &self,
        user_id: &str,
        bill_id: &str,
        account_id: &str,
        amount: Decimal,
    ) -> LedgerResult<BillPaymentReceipt> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount("Bill payment", amount));
        }

        let _guard = self
            .ctx
            .locks()
            .acquire(account_id, self.ctx.config().lock_wait)
            .await?;

        let bill: Bill = BillRepo::get_by_id(self.ctx.pool(), bill_id)
            .await?
            .try_into()
            .map_err(LedgerError::from)?;
        if bill.user_id != user_id {
            // Someone else's bill looks like no bill at all
            return Err(LedgerError::not_found("Bill", bill_id));
        }
        if !bill.is_pending() {
            return Err(LedgerError::BillAlreadyPaid {
                bill_id: bill_id.to_string(),
            });
        }

        let account = self.load_account(account_id).await?;
        self.check_frozen(&account)?;
        if account.balance < amount {
            warn!(account = %account.id, %amount, available = %account.balance, "bill payment rejected");
            return Err(LedgerError::insufficient_funds(amount, account.balance));
        }
        let new_balance = account.balance - amount;

        let record = Transaction::debit(user_id, &account.id, amount, "Bill payment");

        let mut tx = self.ctx.pool().begin().await?;
        AccountRepo::set_balance(&mut *tx, &account.id, new_balance).await?;
        // The WHERE guard makes the flip first-writer-wins; a payment
        // racing through another account loses here and rolls back
        let flipped = BillRepo::mark_paid(&mut *tx, bill_id).await?;
        if flipped == 0 {
            return Err(LedgerError::BillAlreadyPaid {
                bill_id: bill_id.to_string(),
            });
        }
        TransactionRepo::insert(&mut *tx, &TransactionRow::from(&record)).await?;
        tx.commit().await?;

        info!(account = %account.id, bill = %bill_id, %amount, balance = %new_balance, "bill paid");
        Ok(BillPaymentReceipt {
            transaction_id: record.id,
            bill_id: bill_id.to_string(),
            new_balance,
        })
    }

    async fn load_account(&self, account_id: &str) -> LedgerResult<Account> {
        let row = AccountRepo::get_by_id(self.ctx.pool(), account_id).await?;
        Account::try_from(row).map_err(LedgerError::from)
    }

    fn check_frozen(&self, account: &Account) -> LedgerResult<()> {
        if self.ctx.config().enforce_frozen && account.is_frozen() {
            return Err(LedgerError::AccountFrozen {
                account_id: account.id.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::RegistrationService;
    use crate::services::ProcessorConfig;
    use crate::testutil::{setup, setup_with_config};
    use minibank_core::AccountStatus;
    use minibank_persistence::TransactionRepo;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    #[tokio::test]
    async fn test_transfer_rejects_non_positive_amounts() {
        let (_dir, ctx, reg) = setup().await;
        let processor = TransactionProcessor::new(&ctx);

        for amount in [dec!(0), dec!(-10)] {
            let err = processor
                .transfer(&reg.user_id, &reg.checking_account_id, None, amount, "x")
                .await
                .unwrap_err();
            assert!(matches!(err, LedgerError::InvalidAmount(_)));
        }

        // No transaction rows were written
        let count = TransactionRepo::count_for_account(ctx.pool(), &reg.checking_account_id)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_transfer_debits_and_appends() {
        let (_dir, ctx, reg) = setup().await;
        let processor = TransactionProcessor::new(&ctx);

        processor
            .deposit(&reg.user_id, "checking", dec!(500))
            .await
            .unwrap();
        let receipt = processor
            .transfer(&reg.user_id, &reg.checking_account_id, None, dec!(200), "rent")
            .await
            .unwrap();

        assert_eq!(receipt.new_balance, dec!(300));
        let sum = TransactionRepo::sum_for_account(ctx.pool(), &reg.checking_account_id)
            .await
            .unwrap();
        assert_eq!(sum, dec!(300));
    }

    #[tokio::test]
    async fn test_transfer_insufficient_funds_writes_nothing() {
        let (_dir, ctx, reg) = setup().await;
        let processor = TransactionProcessor::new(&ctx);

        let err = processor
            .transfer(&reg.user_id, &reg.checking_account_id, None, dec!(50), "x")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientFunds { required, available }
                if required == dec!(50) && available == dec!(0)
        ));

        let count = TransactionRepo::count_for_account(ctx.pool(), &reg.checking_account_id)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_transfer_unknown_account() {
        let (_dir, ctx, reg) = setup().await;
        let processor = TransactionProcessor::new(&ctx);

        let err = processor
            .transfer(&reg.user_id, "no-such-account", None, dec!(10), "x")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_transfer_ignores_destination_by_default() {
        let (_dir, ctx, reg) = setup().await;
        let processor = TransactionProcessor::new(&ctx);

        processor.deposit(&reg.user_id, "checking", dec!(500)).await.unwrap();
        processor
            .transfer(
                &reg.user_id,
                &reg.checking_account_id,
                Some(&reg.savings_account_id),
                dec!(100),
                "move",
            )
            .await
            .unwrap();

        // Default mode: the savings account is never credited
        let savings = AccountRepo::get_by_id(ctx.pool(), &reg.savings_account_id)
            .await
            .unwrap();
        assert_eq!(savings.balance(), dec!(0));
    }

    #[tokio::test]
    async fn test_transfer_credits_destination_when_configured() {
        let config = ProcessorConfig {
            credit_destination: true,
            ..ProcessorConfig::default()
        };
        let (_dir, ctx, reg) = setup_with_config(config).await;
        let processor = TransactionProcessor::new(&ctx);

        processor.deposit(&reg.user_id, "checking", dec!(500)).await.unwrap();
        let receipt = processor
            .transfer(
                &reg.user_id,
                &reg.checking_account_id,
                Some(&reg.savings_account_id),
                dec!(100),
                "move",
            )
            .await
            .unwrap();

        assert_eq!(receipt.new_balance, dec!(400));
        let savings = AccountRepo::get_by_id(ctx.pool(), &reg.savings_account_id)
            .await
            .unwrap();
        assert_eq!(savings.balance(), dec!(100));

        // Conservation holds on both sides
        for account_id in [&reg.checking_account_id, &reg.savings_account_id] {
            let row = AccountRepo::get_by_id(ctx.pool(), account_id).await.unwrap();
            let sum = TransactionRepo::sum_for_account(ctx.pool(), account_id)
                .await
                .unwrap();
            assert_eq!(row.balance(), sum);
        }
    }

    #[tokio::test]
    async fn test_transfer_to_source_rejected_when_crediting() {
        let config = ProcessorConfig {
            credit_destination: true,
            ..ProcessorConfig::default()
        };
        let (_dir, ctx, reg) = setup_with_config(config).await;
        let processor = TransactionProcessor::new(&ctx);

        processor.deposit(&reg.user_id, "checking", dec!(100)).await.unwrap();
        let err = processor
            .transfer(
                &reg.user_id,
                &reg.checking_account_id,
                Some(&reg.checking_account_id),
                dec!(10),
                "loop",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
    }

    #[tokio::test]
    async fn test_frozen_account_rejected() {
        let (_dir, ctx, reg) = setup().await;
        let processor = TransactionProcessor::new(&ctx);

        processor.deposit(&reg.user_id, "checking", dec!(100)).await.unwrap();
        AccountRepo::set_status(
            ctx.pool(),
            &reg.checking_account_id,
            AccountStatus::Frozen.as_str(),
        )
        .await
        .unwrap();

        let err = processor
            .transfer(&reg.user_id, &reg.checking_account_id, None, dec!(10), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccountFrozen { .. }));

        let err = processor.deposit(&reg.user_id, "checking", dec!(10)).await.unwrap_err();
        assert!(matches!(err, LedgerError::AccountFrozen { .. }));
    }

    #[tokio::test]
    async fn test_frozen_enforcement_can_be_disabled() {
        let config = ProcessorConfig {
            enforce_frozen: false,
            ..ProcessorConfig::default()
        };
        let (_dir, ctx, reg) = setup_with_config(config).await;
        let processor = TransactionProcessor::new(&ctx);

        processor.deposit(&reg.user_id, "checking", dec!(100)).await.unwrap();
        AccountRepo::set_status(
            ctx.pool(),
            &reg.checking_account_id,
            AccountStatus::Frozen.as_str(),
        )
        .await
        .unwrap();

        // With enforcement off the mutation goes through
        let receipt = processor
            .transfer(&reg.user_id, &reg.checking_account_id, None, dec!(10), "x")
            .await
            .unwrap();
        assert_eq!(receipt.new_balance, dec!(90));
    }

    #[tokio::test]
    async fn test_contended_account_returns_busy() {
        let config = ProcessorConfig {
            lock_wait: Duration::from_millis(50),
            ..ProcessorConfig::default()
        };
        let (_dir, ctx, reg) = setup_with_config(config).await;
        let processor = TransactionProcessor::new(&ctx);

        processor.deposit(&reg.user_id, "checking", dec!(100)).await.unwrap();

        let _held = ctx
            .locks()
            .acquire(&reg.checking_account_id, Duration::from_secs(1))
            .await
            .unwrap();

        let err = processor
            .transfer(&reg.user_id, &reg.checking_account_id, None, dec!(10), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Busy { .. }));

        // Nothing was written while blocked
        let row = AccountRepo::get_by_id(ctx.pool(), &reg.checking_account_id)
            .await
            .unwrap();
        assert_eq!(row.balance(), dec!(100));
    }

    #[tokio::test]
    async fn test_deposit_unknown_type_goes_to_checking() {
        let (_dir, ctx, reg) = setup().await;
        let processor = TransactionProcessor::new(&ctx);

        let receipt = processor
            .deposit(&reg.user_id, "brokerage", dec!(42))
            .await
            .unwrap();
        assert_eq!(receipt.account_id, reg.checking_account_id);
        assert_eq!(receipt.new_balance, dec!(42));
    }

    #[tokio::test]
    async fn test_deposit_fails_without_matching_account() {
        let (_dir, ctx, _reg) = setup().await;
        let processor = TransactionProcessor::new(&ctx);

        let err = processor
            .deposit("ghost-user", "checking", dec!(42))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_pay_bill_happy_path() {
        let (_dir, ctx, reg) = setup().await;
        let processor = TransactionProcessor::new(&ctx);

        processor.deposit(&reg.user_id, "checking", dec!(20000)).await.unwrap();
        let bills = BillRepo::get_by_user(ctx.pool(), &reg.user_id).await.unwrap();
        let bill = bills.iter().find(|b| b.biller_name == "Phone Bill").unwrap();

        let receipt = processor
            .pay_bill(&reg.user_id, &bill.id, &reg.checking_account_id, dec!(7500))
            .await
            .unwrap();
        assert_eq!(receipt.new_balance, dec!(12500));

        let paid = BillRepo::get_by_id(ctx.pool(), &bill.id).await.unwrap();
        assert_eq!(paid.status, "paid");

        let sum = TransactionRepo::sum_for_account(ctx.pool(), &reg.checking_account_id)
            .await
            .unwrap();
        assert_eq!(sum, dec!(12500));
    }

    #[tokio::test]
    async fn test_pay_bill_twice_rejected_without_double_debit() {
        let (_dir, ctx, reg) = setup().await;
        let processor = TransactionProcessor::new(&ctx);

        processor.deposit(&reg.user_id, "checking", dec!(20000)).await.unwrap();
        let bills = BillRepo::get_by_user(ctx.pool(), &reg.user_id).await.unwrap();
        let bill = bills.iter().find(|b| b.biller_name == "Phone Bill").unwrap();

        processor
            .pay_bill(&reg.user_id, &bill.id, &reg.checking_account_id, dec!(7500))
            .await
            .unwrap();
        let err = processor
            .pay_bill(&reg.user_id, &bill.id, &reg.checking_account_id, dec!(7500))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::BillAlreadyPaid { .. }));

        let row = AccountRepo::get_by_id(ctx.pool(), &reg.checking_account_id)
            .await
            .unwrap();
        assert_eq!(row.balance(), dec!(12500));
    }

    #[tokio::test]
    async fn test_pay_bill_of_another_user_is_not_found() {
        let (_dir, ctx, reg) = setup().await;
        let other = RegistrationService::new(&ctx)
            .register("Bob", "bob@example.com", "secret123")
            .await
            .unwrap();
        let processor = TransactionProcessor::new(&ctx);

        processor.deposit(&reg.user_id, "checking", dec!(20000)).await.unwrap();
        let bobs_bills = BillRepo::get_by_user(ctx.pool(), &other.user_id).await.unwrap();

        let err = processor
            .pay_bill(
                &reg.user_id,
                &bobs_bills[0].id,
                &reg.checking_account_id,
                dec!(100),
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_pay_bill_insufficient_funds_leaves_bill_pending() {
        let (_dir, ctx, reg) = setup().await;
        let processor = TransactionProcessor::new(&ctx);

        let bills = BillRepo::get_by_user(ctx.pool(), &reg.user_id).await.unwrap();
        let bill = bills.iter().find(|b| b.biller_name == "Phone Bill").unwrap();

        let err = processor
            .pay_bill(&reg.user_id, &bill.id, &reg.checking_account_id, dec!(7500))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));

        let row = BillRepo::get_by_id(ctx.pool(), &bill.id).await.unwrap();
        assert_eq!(row.status, "pending");
    }
}
