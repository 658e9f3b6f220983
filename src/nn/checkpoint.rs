/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 模块树检查点：参数的二进制保存/加载 + 完整模型（描述 JSON + 参数 bin）
 *
 * 只持久化扁平参数列表的数值，不持久化模块结构：
 * 加载前须先用代码构建出与保存时相同结构的模块树。
 * 加载通过共享的 Variable 句柄原地写入，因此子模块自身也能看到新值。
 */

use super::{Module, ModuleDescriptor, ModuleError};
use crate::tensor::Tensor;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::info;

/// 参数文件魔数
const PARAMS_MAGIC: &[u8; 4] = b"NNCP";
/// 参数文件版本
const PARAMS_VERSION: u32 = 1;

fn io_error(context: &str) -> impl FnOnce(std::io::Error) -> ModuleError + '_ {
    move |e| ModuleError::Checkpoint(format!("{context}: {e}"))
}

/// 保存模块的扁平参数列表到二进制文件
pub fn save_params<P: AsRef<Path>>(module: &dyn Module, path: P) -> Result<(), ModuleError> {
    let file = File::create(path.as_ref()).map_err(io_error("无法创建参数文件"))?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(PARAMS_MAGIC)
        .map_err(io_error("写入魔数失败"))?;
    writer
        .write_all(&PARAMS_VERSION.to_le_bytes())
        .map_err(io_error("写入版本失败"))?;

    let tensors: Vec<Tensor> = module.params().iter().map(|p| p.tensor()).collect();
    bincode::serialize_into(&mut writer, &tensors)
        .map_err(|e| ModuleError::Checkpoint(format!("序列化参数失败: {e}")))?;
    writer.flush().map_err(io_error("刷新缓冲区失败"))?;

    info!(
        path = %path.as_ref().display(),
        num_params = tensors.len(),
        "参数已保存"
    );
    Ok(())
}

/// 从二进制文件加载参数，原地写入模块的扁平参数列表
///
/// 参数个数或任一参数形状与当前模块不一致时报错，且不会写入任何参数。
pub fn load_params<P: AsRef<Path>>(module: &dyn Module, path: P) -> Result<(), ModuleError> {
    let file = File::open(path.as_ref()).map_err(io_error("无法打开参数文件"))?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 4];
    reader
        .read_exact(&mut magic)
        .map_err(io_error("读取魔数失败"))?;
    if &magic != PARAMS_MAGIC {
        return Err(ModuleError::Checkpoint(
            "无效的参数文件：请确保使用 save_params() 保存的文件".to_string(),
        ));
    }

    let mut version_bytes = [0u8; 4];
    reader
        .read_exact(&mut version_bytes)
        .map_err(io_error("读取版本失败"))?;
    let version = u32::from_le_bytes(version_bytes);
    if version != PARAMS_VERSION {
        return Err(ModuleError::Checkpoint(format!(
            "不支持的参数文件版本: {version}"
        )));
    }

    let tensors: Vec<Tensor> = bincode::deserialize_from(&mut reader)
        .map_err(|e| ModuleError::Checkpoint(format!("反序列化参数失败: {e}")))?;

    let params = module.params();
    if tensors.len() != params.len() {
        return Err(ModuleError::Checkpoint(format!(
            "参数个数不一致：文件中为 {}，模块中为 {}",
            tensors.len(),
            params.len()
        )));
    }
    if let Some((i, (param, tensor))) = params
        .iter()
        .zip(&tensors)
        .enumerate()
        .find(|(_, (param, tensor))| param.shape() != tensor.shape())
    {
        return Err(ModuleError::Checkpoint(format!(
            "第{i}个参数形状不一致：文件中为{:?}，模块中为{:?}",
            tensor.shape(),
            param.shape()
        )));
    }

    for (param, tensor) in params.iter().zip(tensors) {
        param.set_tensor(tensor);
    }
    info!(path = %path.as_ref().display(), num_params = params.len(), "参数已加载");
    Ok(())
}

/// 保存完整模型（描述 JSON + 参数 bin）
///
/// 自动生成两个文件：
/// - `{path}.json`: 模块树的描述（可读）
/// - `{path}.bin`: 参数数据（紧凑）
pub fn save_model<P: AsRef<Path>>(module: &dyn Module, path: P) -> Result<(), ModuleError> {
    let path = path.as_ref();
    let json_path = path.with_extension("json");
    let bin_path = path.with_extension("bin");

    save_params(module, &bin_path)?;

    let mut descriptor = ModuleDescriptor::describe(module);
    descriptor.params_file = Some(bin_path.file_name().map_or_else(
        || "params.bin".to_string(),
        |s| s.to_string_lossy().to_string(),
    ));

    let json = descriptor
        .to_json()
        .map_err(|e| ModuleError::Checkpoint(format!("序列化模块描述失败: {e}")))?;
    std::fs::write(&json_path, json).map_err(io_error("写入 JSON 文件失败"))?;
    Ok(())
}

/// 加载完整模型的参数（需要先用代码构建相同结构的模块树），返回保存时的描述
pub fn load_model<P: AsRef<Path>>(
    module: &dyn Module,
    path: P,
) -> Result<ModuleDescriptor, ModuleError> {
    let path = path.as_ref();
    let json_path = path.with_extension("json");

    let json = std::fs::read_to_string(&json_path).map_err(io_error("读取 JSON 文件失败"))?;
    let descriptor = ModuleDescriptor::from_json(&json)
        .map_err(|e| ModuleError::Checkpoint(format!("解析模块描述失败: {e}")))?;

    let bin_path = match descriptor.params_file {
        Some(ref params_file) => path.parent().map_or_else(
            || Path::new(params_file).to_path_buf(),
            |p| p.join(params_file),
        ),
        None => path.with_extension("bin"),
    };
    load_params(module, &bin_path)?;
    Ok(descriptor)
}
