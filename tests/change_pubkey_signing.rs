use rollup_signer::tx::encoding;
use rollup_signer::{
    ChangePubKeyRequest, Error, L1SignerType, Layer1Identity, Signer, TxSignature, ZkLinkSigner,
};

/// Test data builders
mod test_data {
    use super::*;

    // Keys were generated for testing and shouldn't be used with any real funds
    pub const ETH_KEY: &str = "be725250b123a39dab5b7579334d5888987c72a58f4508062545fe6e08ca94f4";
    pub const STARK_KEY: &str =
        "0x0139fe4d6f02e666e86a6f58e65060f115cd3c185bd9e98bd829636931458f79";

    pub const SCENARIO_BYTES: &str = concat!(
        "06",
        "01",
        "00000002",
        "04",
        "d8d5fb6a6caef06aa3dc2abdcdc240987e5330fe",
        "0001",
        "0c80",
        "00000064",
        "00000064",
    );

    pub fn scenario_request() -> ChangePubKeyRequest {
        ChangePubKeyRequest::new(
            1,
            2,
            4,
            "0xd8d5fb6a6caef06aa3dc2abdcdc240987e5330fe",
            1,
            "100",
            100,
        )
        .with_timestamp(100)
    }

    pub fn request_for(signer: &Signer, nonce: u32) -> ChangePubKeyRequest {
        ChangePubKeyRequest::new(1, 2, 4, signer.pubkey_hash().as_hex(), 1, "100", nonce)
            .with_timestamp(1_693_472_232)
    }

    pub fn starknet() -> L1SignerType {
        L1SignerType::Starknet {
            chain_id: "SN_MAIN".to_string(),
            address: "0x04a69b67bcabfa7d3ccb96e1d25c2e6fc93589fe24a6fd04566b8700ff97a71a"
                .to_string(),
        }
    }
}

mod encoding_tests {
    use super::*;

    #[test]
    fn test_scenario_canonical_bytes() {
        let tx = test_data::scenario_request().build().unwrap();
        assert_eq!(hex::encode(tx.get_bytes()), test_data::SCENARIO_BYTES);
        assert_eq!(
            hex::encode(tx.tx_hash()),
            "4484706fd5864145c35e9a654a7d4efdac2b7a3b3f7dbce05601ecb29b0e187d"
        );
    }

    #[test]
    fn test_decode_preserves_fields() {
        let tx = test_data::scenario_request().build().unwrap();
        let decoded = encoding::decode(&tx.get_bytes()).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn test_validation_reports_field() {
        let mut request = test_data::scenario_request();
        request.new_pk_hash.pop();
        match request.build() {
            Err(Error::Validation { field, .. }) => assert_eq!(field, "newPkHash"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}

mod primary_signature_tests {
    use super::*;

    #[test]
    fn test_fixed_seed_signature() {
        let signer = ZkLinkSigner::new_from_seed(&[0x11; 32]).unwrap();
        let bytes = hex::decode(test_data::SCENARIO_BYTES).unwrap();
        let signature = signer.sign_musig(&bytes);
        assert_eq!(
            signature.pub_key.as_hex(),
            "0x1c2868d939c620b5f590014ae704ac30997e3c24317ef34eed71326a1093a0f6"
        );
        assert_eq!(
            hex::encode(signature.signature.0),
            "02e54035d530a03da3b7acb339ba3b9a71c66cd9a6219c652106a506159ce2fb\
             5b3242aac1a576e9d9ea3f136e605d2c88e51071982afd7e4cb5636d92d5f80f"
        );
        assert!(signature.verify_musig(&bytes));
    }

    #[test]
    fn test_bundle_without_l1_auth() {
        let signer = Signer::new(test_data::ETH_KEY, L1SignerType::Eth).unwrap();
        let tx = test_data::request_for(&signer, 1).build().unwrap();
        let bundle = signer.sign_change_pubkey_with_onchain_auth_data(tx.clone()).unwrap();
        assert_eq!(bundle.tx_bytes(), tx.get_bytes().as_slice());
        assert!(bundle.verify_tx_signature());
        assert!(bundle.signature_binds_new_pk_hash());
        assert!(bundle.layer1_signature().is_none());
    }
}

mod layer1_tests {
    use super::*;

    #[test]
    fn test_eth_bundle_verifies_from_json() {
        let signer = Signer::new(test_data::ETH_KEY, L1SignerType::Eth).unwrap();
        let tx = test_data::request_for(&signer, 7).build().unwrap();
        let json = signer
            .sign_change_pubkey_with_eth_ecdsa_auth(tx)
            .unwrap()
            .to_json()
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["layer1Signature"]["type"], "EthereumSignature");

        let bundle = TxSignature::from_json(&json).unwrap();
        assert!(bundle.verify_tx_signature());
        assert!(bundle
            .verify_layer1_signature(&L1SignerType::Eth, &signer.layer1_identity())
            .unwrap());
    }

    #[test]
    fn test_eth_signature_from_other_owner_is_rejected() {
        let signer = Signer::new(test_data::ETH_KEY, L1SignerType::Eth).unwrap();
        let other = Signer::new(&hex::encode([5u8; 32]), L1SignerType::Eth).unwrap();
        let tx = test_data::request_for(&signer, 7).build().unwrap();
        let bundle = other.sign_change_pubkey_with_eth_ecdsa_auth(tx).unwrap();
        assert!(!bundle
            .verify_layer1_signature(&L1SignerType::Eth, &signer.layer1_identity())
            .unwrap());
    }

    #[test]
    fn test_starknet_bundle() {
        let signer = Signer::new(test_data::STARK_KEY, test_data::starknet()).unwrap();
        let tx = test_data::request_for(&signer, 3).build().unwrap();
        let bundle = signer.sign_change_pubkey_with_eth_ecdsa_auth(tx).unwrap();
        assert!(bundle.verify_tx_signature());
        assert!(bundle.signature_binds_new_pk_hash());
        assert!(bundle
            .verify_layer1_signature(&test_data::starknet(), &signer.layer1_identity())
            .unwrap());
        assert!(matches!(
            signer.layer1_identity(),
            Layer1Identity::Starknet(_)
        ));
    }

    #[test]
    fn test_supplied_signature_is_byte_identical() {
        let signer = Signer::new(test_data::ETH_KEY, L1SignerType::Eth).unwrap();
        let supplied = format!("0x{}00", "ab".repeat(64));
        let tx = test_data::request_for(&signer, 9)
            .with_layer1_signature(supplied.clone())
            .build()
            .unwrap();
        let bundle = signer.sign_change_pubkey_with_eth_ecdsa_auth(tx).unwrap();
        assert_eq!(bundle.layer1_signature().unwrap().as_hex(), supplied);
    }
}
