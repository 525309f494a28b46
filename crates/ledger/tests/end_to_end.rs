//! End-to-end scenario: register, authenticate, deposit, transfer, pay a
//! bill, take a loan - checking conservation along the way.

mod common;

use common::setup_empty;
use minibank_ledger::{
    AccountService, LoanService, RegistrationService, SessionService, TransactionProcessor,
};
use minibank_persistence::{AccountRepo, BillRepo, TransactionRepo};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_full_customer_journey() {
    let (_dir, ctx) = setup_empty().await;

    // Register: two accounts, both at zero
    let reg = RegistrationService::new(&ctx)
        .register("Alice", "alice@example.com", "secret123")
        .await
        .unwrap();
    let accounts = AccountService::new(&ctx).list(&reg.user_id).await.unwrap();
    assert_eq!(accounts.len(), 2);
    assert!(accounts.iter().all(|a| a.balance == dec!(0)));

    // Authenticate the way the request layer would
    let sessions = SessionService::new();
    let login = sessions
        .login(ctx.pool(), "alice@example.com", "secret123")
        .await
        .unwrap();
    let identity = sessions.resolve(&login.token).await.unwrap();
    assert_eq!(identity.user_id, reg.user_id);

    let processor = TransactionProcessor::new(&ctx);

    // Deposit 500 into checking
    let deposit = processor
        .deposit(&identity.user_id, "checking", dec!(500))
        .await
        .unwrap();
    assert_eq!(deposit.new_balance, dec!(500));
    assert_eq!(deposit.account_id, reg.checking_account_id);

    // Transfer 200 out
    let transfer = processor
        .transfer(
            &identity.user_id,
            &reg.checking_account_id,
            None,
            dec!(200),
            "to landlord",
        )
        .await
        .unwrap();
    assert_eq!(transfer.new_balance, dec!(300));

    // The account references exactly two transactions: +500 and -200
    let rows = TransactionRepo::get_by_account(ctx.pool(), &reg.checking_account_id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].amount, "500");
    assert_eq!(rows[1].amount, "-200");

    // Pay the phone bill
    let bills = BillRepo::get_by_user(ctx.pool(), &reg.user_id).await.unwrap();
    assert_eq!(bills.len(), 5);
    let phone = bills.iter().find(|b| b.biller_name == "Phone Bill").unwrap();

    processor
        .deposit(&identity.user_id, "checking", dec!(8000))
        .await
        .unwrap();
    let payment = processor
        .pay_bill(
            &identity.user_id,
            &phone.id,
            &reg.checking_account_id,
            dec!(7500),
        )
        .await
        .unwrap();
    assert_eq!(payment.new_balance, dec!(800));
    assert_eq!(
        BillRepo::get_by_id(ctx.pool(), &phone.id).await.unwrap().status,
        "paid"
    );

    // Conservation: stored balance equals the signed sum of the log
    let row = AccountRepo::get_by_id(ctx.pool(), &reg.checking_account_id)
        .await
        .unwrap();
    let sum = TransactionRepo::sum_for_account(ctx.pool(), &reg.checking_account_id)
        .await
        .unwrap();
    assert_eq!(row.balance(), sum);
    assert_eq!(sum, dec!(800));

    // Take out a home loan; no balance moves
    let loan = LoanService::new(&ctx)
        .apply(&identity.user_id, "home", dec!(120000), Some(60))
        .await
        .unwrap();
    assert_eq!(loan.interest_rate, 8.5);
    let after_loan = AccountRepo::get_by_id(ctx.pool(), &reg.checking_account_id)
        .await
        .unwrap();
    assert_eq!(after_loan.balance(), dec!(800));

    // Log out; the token dies with the session
    assert!(sessions.logout(&login.token).await);
    assert!(sessions.resolve(&login.token).await.is_err());
}

#[tokio::test]
async fn test_savings_stays_untouched_by_checking_traffic() {
    let (_dir, ctx) = setup_empty().await;
    let reg = RegistrationService::new(&ctx)
        .register("Alice", "alice@example.com", "secret123")
        .await
        .unwrap();

    let processor = TransactionProcessor::new(&ctx);
    processor.deposit(&reg.user_id, "checking", dec!(500)).await.unwrap();
    processor
        .transfer(&reg.user_id, &reg.checking_account_id, None, dec!(100), "out")
        .await
        .unwrap();

    let savings = AccountRepo::get_by_id(ctx.pool(), &reg.savings_account_id)
        .await
        .unwrap();
    assert_eq!(savings.balance(), dec!(0));
    assert_eq!(
        TransactionRepo::count_for_account(ctx.pool(), &reg.savings_account_id)
            .await
            .unwrap(),
        0
    );
}
