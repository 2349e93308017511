//! Resolve vault accounts end to end against an in-memory account source

use clmm_vault_sdk::{
    instructions::DepositParams,
    protocol::associated_token_address,
    state::MintInfo,
    testing::{mint_data, MockAccountReader, VaultScenario},
    AccountCache, DepositWithdrawAccounts, SdkConfig, SdkError, VaultClient,
};
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;

/// Named accounts around the position bundle, in deposit order
fn deposit_keys(accounts: &DepositWithdrawAccounts, whirlpool_program_id: Pubkey) -> Vec<Pubkey> {
    let vault = &accounts.vault;
    let mut keys = vec![
        accounts.user_signer,
        vault.vault_account,
        vault.lp_mint,
        vault.input_token_a_account,
        vault.input_token_b_account,
        accounts.user_lp_token_account,
        accounts.user_token_a_account,
        accounts.user_token_b_account,
        whirlpool_program_id,
    ];
    keys.extend(accounts.position.to_account_metas().iter().map(|meta| meta.pubkey));
    keys.extend([accounts.pool_token_vault_a, accounts.pool_token_vault_b, spl_token::id()]);
    keys
}

#[tokio::test]
async fn test_vault_addresses_resolve_once() {
    let scenario = VaultScenario::new(64, 1000, 7);
    let client = VaultClient::with_reader(SdkConfig::localnet(), scenario.reader.clone()).unwrap();

    let first = client.resolver().vault_addresses(scenario.key).await.unwrap();
    let reads = scenario.reader.call_count();
    assert_eq!(reads, 1);

    let second = client.resolver().vault_addresses(scenario.key).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(scenario.reader.call_count(), reads);

    assert_eq!(first.vault_account, scenario.vault_address);
    assert_eq!(
        first.input_token_a_account,
        associated_token_address(&scenario.vault_address, &scenario.pool.token_mint_a)
    );
    assert_eq!(
        first.input_token_b_account,
        associated_token_address(&scenario.vault_address, &scenario.pool.token_mint_b)
    );
    assert_eq!(first.lp_mint, client.resolver().pda().lp_mint(&scenario.vault_address).0);
}

#[tokio::test]
async fn test_empty_vault_has_no_active_position() {
    let scenario = VaultScenario::new(64, 1000, 7);
    let client = VaultClient::with_reader(SdkConfig::localnet(), scenario.reader.clone()).unwrap();

    let err = client.resolver().active_position(scenario.key).await.unwrap_err();
    assert!(matches!(err, SdkError::Configuration(_)));

    let err = client
        .deposit(
            Pubkey::new_unique(),
            scenario.key,
            DepositParams {
                lp_amount: 1,
                max_amount_a: 1,
                max_amount_b: 1,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Configuration(_)));
}

#[tokio::test]
async fn test_uncached_addresses_share_one_read() {
    let reader = Arc::new(MockAccountReader::new());
    let mints: Vec<Pubkey> = (0..5).map(|_| Pubkey::new_unique()).collect();
    for (i, mint) in mints.iter().enumerate() {
        reader.insert(*mint, mint_data(i as u8));
    }
    let cache = AccountCache::new(reader.clone());

    let decoded: Vec<MintInfo> = cache.get_many(&mints, false).await.unwrap();
    assert_eq!(decoded.iter().map(|m| m.decimals).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    assert_eq!(reader.calls(), vec![mints.clone()]);

    // Cached now; only the forced read goes out again
    let _: Vec<MintInfo> = cache.get_many(&mints, false).await.unwrap();
    assert_eq!(reader.call_count(), 1);
    let _: MintInfo = cache.get(&mints[2], true).await.unwrap();
    assert_eq!(reader.calls()[1], vec![mints[2]]);
}

#[tokio::test]
async fn test_missing_account_is_named_and_others_stay_cached() {
    let reader = Arc::new(MockAccountReader::new());
    let present = Pubkey::new_unique();
    let missing = Pubkey::new_unique();
    reader.insert(present, mint_data(6));
    let cache = AccountCache::new(reader.clone());

    let err = cache
        .get_many::<MintInfo>(&[present, missing], false)
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::AccountNotFound(address) if address == missing));
    assert!(cache.contains(&present));
    assert!(!cache.contains(&missing));

    let mint: MintInfo = cache.get(&present, false).await.unwrap();
    assert_eq!(mint.decimals, 6);
    assert_eq!(reader.call_count(), 1);
}

#[tokio::test]
async fn test_reader_failure_leaves_cache_untouched() {
    let reader = Arc::new(MockAccountReader::new());
    let mint = Pubkey::new_unique();
    reader.insert(mint, mint_data(9));
    let cache = AccountCache::new(reader.clone());

    reader.fail_next("node unavailable");
    let err = cache.get::<MintInfo>(&mint, false).await.unwrap_err();
    assert!(matches!(err, SdkError::Rpc(_)));
    assert!(cache.is_empty());

    let decoded: MintInfo = cache.get(&mint, false).await.unwrap();
    assert_eq!(decoded.decimals, 9);
}

#[tokio::test]
async fn test_deposit_accounts_follow_instruction_layout() {
    let scenario = VaultScenario::new(64, 1000, 7).with_position(-6000, 6000, 1 << 24);
    let client = VaultClient::with_reader(SdkConfig::localnet(), scenario.reader.clone()).unwrap();
    let user = Pubkey::new_unique();

    let ix = client
        .deposit(
            user,
            scenario.key,
            DepositParams {
                lp_amount: 10,
                max_amount_a: 20,
                max_amount_b: 30,
            },
        )
        .await
        .unwrap();

    let accounts = client
        .resolver()
        .deposit_withdraw_accounts(&user, scenario.key)
        .await
        .unwrap();
    let keys: Vec<Pubkey> = ix.accounts.iter().map(|meta| meta.pubkey).collect();
    assert_eq!(keys, deposit_keys(&accounts, client.config().whirlpool_program_id));

    let pda = client.resolver().pda();
    assert_eq!(accounts.position.position, scenario.position_address().unwrap());
    assert_eq!(accounts.position.tick_array_lower, pda.tick_array(&scenario.key.pool, -11264).0);
    assert_eq!(accounts.position.tick_array_upper, pda.tick_array(&scenario.key.pool, 5632).0);
    assert_eq!(
        accounts.user_lp_token_account,
        associated_token_address(&user, &accounts.vault.lp_mint)
    );
    assert_eq!(accounts.pool_token_vault_a, scenario.pool.token_vault_a);
}
