//! 应答帧解析
//!
//! 设备对每个查询命令以固定 5 字节帧应答：
//!
//! ```text
//! +--------+--------+--------+--------+--------+
//! | byte 0 | byte 1 | byte 2 | byte 3 | byte 4 |
//! | status |  f32 位模式，最低位字节先到        |
//! +--------+--------+--------+--------+--------+
//! ```
//!
//! byte 0 是状态/命令回显字节；bytes 1-4 按传输逆序重组为 32 位整数后，
//! 以 IEEE-754 单精度位模式解释。设定命令的 4 字节目标值按同一字节序
//! （最低位在前）发送。

use crate::ProtocolError;

/// 应答帧固定长度
pub const FRAME_LEN: usize = 5;

/// 解码后的应答帧
///
/// # 设计特性
///
/// - **Copy trait**：零成本复制，RX 线程每帧构造一次
/// - **自包含**：不持有缓冲区引用，解码即脱离原始字节
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErgFrame {
    /// 状态/种类字节（含义取决于所回应的查询）
    pub status: u8,

    /// 重组后的浮点值
    pub value: f32,
}

impl ErgFrame {
    /// 解码一个完整的 5 字节帧
    ///
    /// bytes 1-4 逆序重组：byte 4 为最高位字节。任意位模式都解码为
    /// 某个 f32 值（包括 NaN/Inf），不会 panic。畸形位模式由上层
    /// 按 `ProtocolError` 处理策略决定丢弃与否。
    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.len() != FRAME_LEN {
            return Err(ProtocolError::InvalidLength {
                expected: FRAME_LEN,
                actual: buf.len(),
            });
        }

        let bits = u32::from_le_bytes([buf[1], buf[2], buf[3], buf[4]]);
        Ok(Self {
            status: buf[0],
            value: f32::from_bits(bits),
        })
    }

    /// 按传输顺序编码一个浮点值（不含状态字节）
    ///
    /// 用于构造测试/模拟应答，也是设定命令目标值的发送顺序。
    pub fn encode_value(value: f32) -> [u8; 4] {
        value.to_bits().to_le_bytes()
    }

    /// 构造一个完整的 5 字节应答帧（测试/模拟用）
    pub fn encode(status: u8, value: f32) -> [u8; FRAME_LEN] {
        let v = Self::encode_value(value);
        [status, v[0], v[1], v[2], v[3]]
    }
}

/// 设定命令的 4 字节目标值编码
///
/// 与 [`ErgFrame::encode_value`] 同序：浮点位模式，最低位字节先发。
/// 每字节一次写入，全部发完后需静置（见 `command::SETTLE_AFTER_CONTROL`）。
pub fn encode_setup_target(target: f32) -> [u8; 4] {
    ErgFrame::encode_value(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// 编码再解码还原原始浮点值（代表性取值）
    #[test]
    fn test_frame_roundtrip_representative() {
        for &v in &[0.0f32, -0.0, 1.0, -273.15, 2500.0, 1.0e20, f32::MIN, f32::MAX] {
            let buf = ErgFrame::encode(0xC4, v);
            let frame = ErgFrame::decode(&buf).unwrap();
            assert_eq!(frame.status, 0xC4);
            assert_eq!(frame.value.to_bits(), v.to_bits(), "value {v} not bit-exact");
        }
    }

    /// 逆序重组：byte 4 是最高位字节
    #[test]
    fn test_decode_byte_order() {
        // 1.0f32 = 0x3F80_0000，传输顺序为 00 00 80 3F
        let frame = ErgFrame::decode(&[0x00, 0x00, 0x00, 0x80, 0x3F]).unwrap();
        assert_eq!(frame.value, 1.0);
    }

    /// 长度不符返回 InvalidLength
    #[test]
    fn test_decode_wrong_length() {
        let err = ErgFrame::decode(&[0x00, 0x01, 0x02]).unwrap_err();
        match err {
            crate::ProtocolError::InvalidLength { expected, actual } => {
                assert_eq!(expected, FRAME_LEN);
                assert_eq!(actual, 3);
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    /// 设定目标值最低位字节先发
    #[test]
    fn test_setup_target_order() {
        // 2000.0f32 = 0x44FA_0000
        assert_eq!(encode_setup_target(2000.0), [0x00, 0x00, 0xFA, 0x44]);
    }

    proptest! {
        /// 任意位模式的编解码往返是位级精确的
        #[test]
        fn prop_roundtrip_bit_exact(bits in any::<u32>(), status in any::<u8>()) {
            let value = f32::from_bits(bits);
            let buf = ErgFrame::encode(status, value);
            let frame = ErgFrame::decode(&buf).unwrap();
            prop_assert_eq!(frame.status, status);
            prop_assert_eq!(frame.value.to_bits(), bits);
        }
    }
}
