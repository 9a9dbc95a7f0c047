//! 录像检查点文件装载
//!
//! 录像文件是此前训练记录下来的 XML 文档，重复的 `<Stroke>` 记录携带
//! Time / Distance / Split / Power / SPM / HR 六个字段。Split 恰为 0
//! 表示该记录只有基础数据（当时没开完整数据采集），回放时功率、桨频、
//! 心率不携带。
//!
//! 本模块只消费该格式，不产出；写入端是记录协作方的职责。

use crate::RaceError;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::path::Path;

/// 一条录像检查点
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Checkpoint {
    /// 采样时刻（秒）
    pub time: f32,
    /// 已划距离（米）
    pub distance: f32,
    /// 500 米分段配速，0 表示该记录只有基础数据
    pub split: f64,
    /// 功率（瓦）
    pub power: f64,
    /// 桨频（桨/分钟）
    pub spm: i32,
    /// 心率（次/分钟）
    pub heart_rate: f32,
}

impl Checkpoint {
    /// 该检查点是否携带完整数据
    pub fn has_full_data(&self) -> bool {
        self.split != 0.0
    }
}

/// `<Stroke>` 记录内当前正在读的字段
#[derive(Clone, Copy)]
enum Field {
    Time,
    Distance,
    Split,
    Power,
    Spm,
    HeartRate,
}

/// 从录像文件装载检查点序列
///
/// 只认 `<Stroke>` 记录，文件里的划手与训练元数据段跳过。任何 IO 或
/// 解析失败都在装载期返回 [`RaceError::ReplayFile`]，不会拖到开赛后。
pub fn load_checkpoints(path: &Path) -> Result<Vec<Checkpoint>, RaceError> {
    let file_err = |reason: String| RaceError::ReplayFile {
        path: path.to_path_buf(),
        reason,
    };

    let text = std::fs::read_to_string(path).map_err(|e| file_err(e.to_string()))?;
    let mut reader = Reader::from_str(&text);
    reader.config_mut().trim_text(true);

    let mut checkpoints = Vec::new();
    let mut current: Option<Checkpoint> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"Stroke" => current = Some(Checkpoint::default()),
                b"Time" if current.is_some() => field = Some(Field::Time),
                b"Distance" if current.is_some() => field = Some(Field::Distance),
                b"Split" if current.is_some() => field = Some(Field::Split),
                b"Power" if current.is_some() => field = Some(Field::Power),
                b"SPM" if current.is_some() => field = Some(Field::Spm),
                b"HR" if current.is_some() => field = Some(Field::HeartRate),
                _ => {},
            },
            Ok(Event::Text(t)) => {
                if let (Some(cp), Some(f)) = (current.as_mut(), field) {
                    let value = std::str::from_utf8(t.as_ref())
                        .map_err(|e| file_err(e.to_string()))?
                        .trim();
                    apply_field(cp, f, value).map_err(&file_err)?;
                }
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"Stroke" => {
                    if let Some(cp) = current.take() {
                        checkpoints.push(cp);
                    }
                },
                _ => field = None,
            },
            Ok(Event::Eof) => break,
            Ok(_) => {},
            Err(e) => return Err(file_err(e.to_string())),
        }
    }

    if checkpoints.is_empty() {
        return Err(file_err("no <Stroke> records found".into()));
    }

    Ok(checkpoints)
}

fn apply_field(cp: &mut Checkpoint, field: Field, text: &str) -> Result<(), String> {
    let bad = |what: &str| format!("invalid {what} value: {text:?}");

    match field {
        Field::Time => cp.time = text.parse().map_err(|_| bad("Time"))?,
        Field::Distance => cp.distance = text.parse().map_err(|_| bad("Distance"))?,
        Field::Split => cp.split = text.parse().map_err(|_| bad("Split"))?,
        Field::Power => cp.power = text.parse().map_err(|_| bad("Power"))?,
        Field::Spm => cp.spm = text.parse().map_err(|_| bad("SPM"))?,
        Field::HeartRate => cp.heart_rate = text.parse().map_err(|_| bad("HR"))?,
    }
    Ok(())
}
