use alloy::sol;

sol! {
    #[sol(all_derives)]
    struct IPMetadata {
        string ipMetadataURI;
        bytes32 ipMetadataHash;
        string nftMetadataURI;
        bytes32 nftMetadataHash;
    }

    #[sol(all_derives)]
    struct PILTerms {
        bool transferable;
        address royaltyPolicy;
        uint256 defaultMintingFee;
        uint256 expiration;
        bool commercialUse;
        bool commercialAttribution;
        address commercializerChecker;
        bytes commercializerCheckerData;
        uint32 commercialRevShare;
        uint256 commercialRevCeiling;
        bool derivativesAllowed;
        bool derivativesAttribution;
        bool derivativesApproval;
        bool derivativesReciprocal;
        uint256 derivativeRevCeiling;
        address currency;
        string uri;
    }

    #[sol(rpc)]
    interface IMintableNft {
        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);

        function mintNFT(address to, string memory uri) external returns (uint256);
    }

    #[sol(rpc)]
    interface IIPAssetRegistry {
        event IPRegistered(
            address ipId,
            uint256 indexed chainId,
            address indexed tokenContract,
            uint256 indexed tokenId,
            string name,
            string uri,
            uint256 registrationDate
        );

        function register(uint256 chainid, address tokenContract, uint256 tokenId)
            external
            returns (address id);
    }

    #[sol(rpc)]
    interface IIPAccount {
        function execute(address to, uint256 value, bytes calldata data)
            external
            payable
            returns (bytes memory result);
    }

    interface ICoreMetadataModule {
        function setAll(
            address ipId,
            string calldata metadataURI,
            bytes32 metadataHash,
            bytes32 nftMetadataHash
        ) external;
    }

    interface ILicensingModule {
        event LicenseTermsAttached(
            address indexed caller,
            address indexed ipId,
            address licenseTemplate,
            uint256 licenseTermsId
        );

        function attachLicenseTerms(address ipId, address licenseTemplate, uint256 licenseTermsId)
            external;
    }

    #[sol(rpc)]
    interface IPILicenseTemplate {
        function registerLicenseTerms(PILTerms calldata terms) external returns (uint256 id);

        function getLicenseTermsId(PILTerms calldata terms)
            external
            view
            returns (uint256 selectedLicenseTermsId);
    }

    #[sol(rpc)]
    interface ILicenseAttachmentWorkflows {
        function mintAndRegisterIpAndAttachPILTerms(
            address spgNftContract,
            address recipient,
            IPMetadata calldata ipMetadata,
            PILTerms calldata terms
        ) external returns (address ipId, uint256 tokenId, uint256 licenseTermsId);
    }
}
