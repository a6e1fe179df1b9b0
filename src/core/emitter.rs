use std::io::Write;

/// 依序輸出固定整數序列的發射器
///
/// 序列在建構時決定後不再改變. `process` 把每個值的十進位文字連同
/// 換行寫進建構時注入的 sink; sink 的生命週期不歸這個元件管, 只追加.
pub struct SequenceEmitter<W: Write> {
    sequence: Vec<i32>,
    sink: W,
}

impl<W: Write> SequenceEmitter<W> {
    /// 預設序列 {1, 2, 3}
    pub fn new(sink: W) -> Self {
        Self::new_with_sequence(vec![1, 2, 3], sink)
    }

    /// 注入自訂序列; 發射邏輯與預設建構相同
    pub fn new_with_sequence(sequence: Vec<i32>, sink: W) -> Self {
        Self { sequence, sink }
    }

    /// 依儲存順序逐一寫出值與行結尾; sink 寫入失敗原樣回傳
    pub fn process(&mut self) -> std::io::Result<()> {
        for value in &self.sequence {
            writeln!(self.sink, "{}", value)?;
        }
        Ok(())
    }

    /// 取回 sink, 通常用來讀取累積的輸出
    pub fn into_inner(self) -> W {
        self.sink
    }
}
