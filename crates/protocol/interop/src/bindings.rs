//! Solidity bindings for the contracts driven by a gas tank relay.
//!
//! <https://github.com/ethereum-optimism/optimism/blob/develop/packages/contracts-bedrock/src/L2/L2ToL2CrossDomainMessenger.sol>

use alloy_sol_types::sol;

sol! {
    /// The struct for a pointer to a message payload in a remote (or local) chain.
    #[derive(Default, Debug, PartialEq, Eq)]
    struct MessageIdentifierAbi {
        address origin;
        uint256 blockNumber;
        uint256 logIndex;
        uint256 timestamp;
        uint256 chainId;
    }

    /// The `L2ToL2CrossDomainMessenger` predeploy.
    interface IL2ToL2CrossDomainMessenger {
        /// Emitted whenever a message is sent to a destination chain.
        #[derive(Default, Debug, PartialEq, Eq)]
        event SentMessage(
            uint256 indexed destination,
            address indexed target,
            uint256 indexed messageNonce,
            address sender,
            bytes message
        );

        /// Sends a message to some target address on a destination chain.
        function sendMessage(
            uint256 _destination,
            address _target,
            bytes calldata _message
        ) external returns (bytes32 messageHash_);

        /// Relays a message that was sent by the other messenger.
        function relayMessage(
            MessageIdentifierAbi calldata _id,
            bytes calldata _sentMessage
        ) external payable returns (bytes memory returnData_);
    }

    /// The gas tank escrow, deployed on both chains.
    interface IGasTank {
        /// Emitted by the destination gas tank once a message has been relayed.
        #[derive(Default, Debug, PartialEq, Eq)]
        event RelayedMessageGasReceipt(
            bytes32 indexed originMessageHash,
            address indexed relayer,
            uint256 relayCost,
            bytes32[] destinationMessageHashes
        );

        /// Emitted by the source gas tank once a relayer has been reimbursed.
        #[derive(Default, Debug, PartialEq, Eq)]
        event Claimed(
            bytes32 indexed originMessageHash,
            address indexed relayer,
            address indexed gasProvider,
            address claimer,
            uint256 relayCost,
            uint256 claimCost
        );

        function deposit(address _to) external payable;

        function authorizeClaim(bytes32 _messageHash) external;

        function MAX_DEPOSIT() external view returns (uint256);

        function balanceOf(address gasProvider) external view returns (uint256 balance);

        function claim(
            MessageIdentifierAbi calldata _id,
            address _gasProvider,
            bytes calldata _payload
        ) external;

        function claimOverhead(uint256 _numHashes) external view returns (uint256 overhead_);

        function relayMessage(
            MessageIdentifierAbi calldata _id,
            bytes calldata _sentMessage
        ) external;
    }

    /// Test contract that fans out nested cross chain messages when called.
    interface IMessageSender {
        function sendMessages(uint256 _destinationChainId, uint256 _numMessages) external;
    }

    /// The supersim test token.
    interface ISuperchainERC20 {
        function mint(address _to, uint256 _amount) external;
    }

    /// The `SuperchainTokenBridge` predeploy.
    interface ISuperchainTokenBridge {
        function sendERC20(address _token, address _to, uint256 _amount, uint256 _chainId) external;
    }
}
