use log::info;
use rollup_signer::prelude::Result;
use rollup_signer::{ChangePubKeyRequest, L1SignerType, Signer};
use std::env;

// Key was randomly generated for testing and shouldn't be used with any real funds
const TEST_PRIVATE_KEY: &str = "be725250b123a39dab5b7579334d5888987c72a58f4508062545fe6e08ca94f4";

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let private_key = env::var("PRIVATE_KEY").unwrap_or_else(|_| TEST_PRIVATE_KEY.to_string());
    let signer = Signer::new(&private_key, L1SignerType::Eth)?;
    info!("new pubkey hash: {}", signer.pubkey_hash());

    // L1 owner signs the auth message now
    let tx = ChangePubKeyRequest::new(1, 2, 4, signer.pubkey_hash().as_hex(), 1, "100", 100)
        .build()?;
    let bundle = signer.sign_change_pubkey_with_eth_ecdsa_auth(tx)?;
    info!("tx hash: 0x{}", hex::encode(bundle.tx_hash()));
    println!("{}", bundle.to_json()?);

    // Authorization collected elsewhere, passed through as given
    let supplied = format!("0x{}1b", "00".repeat(64));
    let tx = ChangePubKeyRequest::new(1, 2, 4, signer.pubkey_hash().as_hex(), 1, "100", 101)
        .with_layer1_signature(supplied)
        .build()?;
    let bundle = signer.sign_change_pubkey_with_eth_ecdsa_auth(tx)?;
    println!("{}", bundle.to_json()?);

    // Already authorized by a contract call
    let tx = ChangePubKeyRequest::new(1, 2, 4, signer.pubkey_hash().as_hex(), 1, "100", 102)
        .build()?;
    let bundle = signer.sign_change_pubkey_with_onchain_auth_data(tx)?;
    println!("{}", bundle.to_json()?);

    Ok(())
}
